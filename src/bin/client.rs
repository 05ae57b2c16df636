use grubdash::cli::*;
use grubdash::errors::Result;
use grubdash::http::{code_to_string, HttpClient, Response};
use grubdash::routes::{self, paths};

#[derive(Debug, PartialEq)]
enum Action {
    List,
    Get,
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Collection {
    Dishes,
    Orders,
}

#[derive(Debug)]
struct CLIOptions {
    target: String,
    action: Action,
    collection: Collection,
    id: Option<String>,
    payload: Option<String>,
}

fn parse_action(action: &str) -> std::result::Result<Action, CLIError> {
    match action.to_ascii_lowercase().as_str() {
        "list" => Ok(Action::List),
        "get" => Ok(Action::Get),
        "create" => Ok(Action::Create),
        "update" => Ok(Action::Update),
        "delete" => Ok(Action::Delete),
        _ => Err(CLIError::InvalidParameter(action.to_string())),
    }
}

fn parse_collection(collection: &str) -> std::result::Result<Collection, CLIError> {
    match collection.to_ascii_lowercase().as_str() {
        "dishes" => Ok(Collection::Dishes),
        "orders" => Ok(Collection::Orders),
        _ => Err(CLIError::InvalidParameter(collection.to_string())),
    }
}

/// Usage: `client [<host>:<port>] <list|get|create|update|delete> <dishes|orders> [id] [json]`
fn parse_cli_args<I>(mut args: I) -> Result<CLIOptions>
where
    I: Iterator<Item = String>,
{
    args.next(); // Skip the program name
    let maybe_target = args
        .next()
        .ok_or(CLIError::MissingParameter("target or action"))?;

    let (target, action) = match validate_address(&maybe_target) {
        Ok(target) => (
            target.to_string(),
            parse_action(&args.next().ok_or(CLIError::MissingParameter("action"))?)?,
        ),
        Err(_) => (DEFAULT_ADDRESS.to_string(), parse_action(&maybe_target)?),
    };

    let collection =
        parse_collection(&args.next().ok_or(CLIError::MissingParameter("collection"))?)?;

    let (id, payload) = match action {
        Action::List => (None, None),
        Action::Get | Action::Delete => (
            Some(args.next().ok_or(CLIError::MissingParameter("id"))?),
            None,
        ),
        Action::Create => (
            None,
            Some(args.next().ok_or(CLIError::MissingParameter("json"))?),
        ),
        Action::Update => (
            Some(args.next().ok_or(CLIError::MissingParameter("id"))?),
            Some(args.next().ok_or(CLIError::MissingParameter("json"))?),
        ),
    };

    if action == Action::Delete && collection == Collection::Dishes {
        return Err(CLIError::InvalidParameter("dishes cannot be deleted".to_string()).into());
    }

    Ok(CLIOptions {
        target,
        action,
        collection,
        id,
        payload,
    })
}

/// Wrap the user-provided JSON in the `{"data": ...}` envelope expected by the server
fn wrap_payload(payload: &str) -> Result<String> {
    let data: serde_json::Value = serde_json::from_str(payload)?;
    Ok(serde_json::json!({ "data": data }).to_string())
}

fn print_response(response: &Response) {
    match response.status {
        Some(code) => println!("Response Status: {} - {}", code, code_to_string(code)),
        None => println!("No status in response"),
    }
    if !response.body.is_empty() {
        match serde_json::from_str::<serde_json::Value>(&response.body) {
            Ok(json) => println!(
                "{}",
                serde_json::to_string_pretty(&json).unwrap_or_else(|_| response.body.clone())
            ),
            Err(e) => println!("Error parsing response body: {}\n{:?}", e, response.body),
        }
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(std::env::args())?;

    let (collection_path, item_path): (&str, fn(&str) -> String) = match options.collection {
        Collection::Dishes => (paths::DISHES, routes::dish_by_id),
        Collection::Orders => (paths::ORDERS, routes::order_by_id),
    };
    let id = options.id.as_deref().unwrap_or_default();
    let body = options
        .payload
        .as_deref()
        .map(wrap_payload)
        .transpose()?
        .unwrap_or_default();

    let (method, path) = match options.action {
        Action::List => ("GET", collection_path.to_string()),
        Action::Get => ("GET", item_path(id)),
        Action::Create => ("POST", collection_path.to_string()),
        Action::Update => ("PUT", item_path(id)),
        Action::Delete => ("DELETE", item_path(id)),
    };

    let mut client = HttpClient::new(&options.target)?;
    let response = client.send(method, &path, &body)?;
    print_response(&response);
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{}", err);
        eprintln!(
            "Usage: client [<host>:<port>] <list|get|create|update|delete> <dishes|orders> [id] [json]"
        );
        std::process::exit(1);
    }
}
