use clap::{Parser, Subcommand};
use reqwest::{Method, StatusCode, Url};
use serde_json::{json, Map, Value};

#[derive(Parser)]
#[command(name = "project-cli")]
#[command(about = "Command-line client for the project API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every project
    List,
    /// Show one project
    Get { title: String },
    /// Create a project
    Create {
        title: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Overwrite fields of a project
    Update {
        title: String,
        /// New title
        #[arg(long)]
        rename: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// active or archived
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Delete a project
    Delete { title: String },
    /// Mark a project archived
    Archive { title: String },
    /// Mark a project active again
    Restore { title: String },
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// `{base}/projects[/{title}[/{action}]]`, with the title percent-encoded.
fn projects_url(base: &str, title: Option<&str>, action: Option<&str>) -> CliResult<Url> {
    let mut url = Url::parse(base)?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| "base URL cannot carry a path")?;
        segments.pop_if_empty().push("projects");
        if let Some(title) = title {
            segments.push(title);
        }
        if let Some(action) = action {
            segments.push(action);
        }
    }
    Ok(url)
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.as_str();

    let (method, url, body) = match cli.command {
        Commands::List => (Method::GET, projects_url(base, None, None)?, None),
        Commands::Get { title } => (Method::GET, projects_url(base, Some(&title), None)?, None),
        Commands::Create { title, description } => {
            let mut body = json!({ "title": title });
            if let Some(description) = description {
                body["description"] = Value::String(description);
            }
            (Method::POST, projects_url(base, None, None)?, Some(body))
        }
        Commands::Update {
            title,
            rename,
            description,
            status,
        } => {
            let mut fields = Map::new();
            for (key, value) in [("title", rename), ("description", description), ("status", status)] {
                if let Some(value) = value {
                    fields.insert(key.to_string(), Value::String(value));
                }
            }
            let url = projects_url(base, Some(&title), None)?;
            (Method::PUT, url, Some(Value::Object(fields)))
        }
        Commands::Delete { title } => {
            (Method::DELETE, projects_url(base, Some(&title), None)?, None)
        }
        Commands::Archive { title } => {
            (Method::PUT, projects_url(base, Some(&title), Some("archive"))?, None)
        }
        Commands::Restore { title } => {
            (Method::PUT, projects_url(base, Some(&title), Some("restore"))?, None)
        }
    };

    let mut request = client.request(method, url);
    if let Some(body) = body {
        request = request.json(&body);
    }
    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> CliResult<()> {
    let status = res.status();
    if !status.is_success() {
        let text = res.text().await.unwrap_or_default();
        return Err(api_failure(status, &text));
    }

    if status == StatusCode::NO_CONTENT {
        println!("OK");
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

/// Error for a non-success answer, using the body's `error` message when it has one.
fn api_failure(status: StatusCode, body: &str) -> Box<dyn std::error::Error> {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_owned))
        .unwrap_or_else(|| body.to_string());
    format!("project API returned status {status}: {detail}").into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projects_url_encodes_title() {
        let url = projects_url("http://localhost:8080", Some("my project/x"), Some("archive")).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/projects/my%20project%2Fx/archive"
        );
    }

    #[test]
    fn test_projects_url_keeps_base_path() {
        let url = projects_url("http://host/api/", None, None).unwrap();
        assert_eq!(url.as_str(), "http://host/api/projects");
    }

    #[test]
    fn test_api_failure_carries_status_and_error_message() {
        let err = api_failure(StatusCode::NOT_FOUND, r#"{"error":"project \"ghost\" not found"}"#);
        assert_eq!(
            err.to_string(),
            "project API returned status 404 Not Found: project \"ghost\" not found"
        );
    }

    #[test]
    fn test_api_failure_falls_back_to_raw_body() {
        let err = api_failure(StatusCode::BAD_GATEWAY, "upstream down");
        assert!(err.to_string().ends_with("502 Bad Gateway: upstream down"));
    }
}
