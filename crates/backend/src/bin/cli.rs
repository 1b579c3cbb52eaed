use anyhow::Context;
use clap::{Parser, Subcommand};
use reqwest::{Client, Response};
use shared_types::{BasicCredentials, RandomFormat, TokenResponse, UserProfile};

#[derive(Parser)]
#[command(name = "demo-cli")]
#[command(about = "CLI for poking at the demo server endpoints")]
#[command(
    long_about = "A command-line client for the demo HTTP server.\n\n\
    Logs in with the OAuth2 password flow, reads the current profile with a\n\
    bearer token, exercises the echo, status and random endpoints, and can\n\
    hash passwords locally for use in an accounts file."
)]
struct Cli {
    /// Demo server URL to connect to.
    #[arg(
        short,
        long,
        default_value = "http://localhost:3000",
        env = "DEMO_API_URL"
    )]
    base_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Exchange a username and password for a bearer token
    ///
    /// Prints the raw token so it can be fed to `me --token`.
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "DEMO_PASSWORD")]
        password: String,
    },

    /// Show the profile behind a bearer token
    Me {
        #[arg(short, long, env = "DEMO_TOKEN")]
        token: String,
    },

    /// Send HTTP Basic credentials and print what the server echoes back
    Basic {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },

    /// Ask the server for an empty response with the given status code
    Status { code: u16 },

    /// Post text to the echo endpoint, optionally delayed by the server
    Echo {
        text: String,

        /// Seconds the server should wait before answering
        #[arg(short, long, value_name = "SECS")]
        wait: Option<u64>,
    },

    /// Fetch a random payload: json, xml, plaintext or html
    Random { format: RandomFormat },

    /// Hash a password with bcrypt for an accounts file. Runs locally.
    HashPassword {
        plaintext: String,

        #[arg(long, default_value_t = bcrypt::DEFAULT_COST)]
        cost: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = Client::new();
    let base_url = cli.base_url.trim_end_matches('/');

    match cli.command {
        Commands::Login { username, password } => {
            let response = client
                .post(format!("{}/auth/oauth2/token", base_url))
                .form(&[("username", username.as_str()), ("password", password.as_str())])
                .send()
                .await?;
            let token: TokenResponse = ensure_success(response).await?.json().await?;
            println!("{}", token.access_token);
        }
        Commands::Me { token } => {
            let response = client
                .get(format!("{}/auth/oauth2/users/me/", base_url))
                .bearer_auth(token)
                .send()
                .await?;
            let profile: UserProfile = ensure_success(response).await?.json().await?;
            println!("Username:  {}", profile.username);
            if let Some(name) = &profile.full_name {
                println!("Full name: {}", name);
            }
            if let Some(email) = &profile.email {
                println!("Email:     {}", email);
            }
            println!("Disabled:  {}", profile.disabled);
        }
        Commands::Basic { username, password } => {
            let response = client
                .get(format!("{}/auth/basic/users/me", base_url))
                .basic_auth(username, Some(password))
                .send()
                .await?;
            let creds: BasicCredentials = ensure_success(response).await?.json().await?;
            println!("{}:{}", creds.username, creds.password);
        }
        Commands::Status { code } => {
            let response = client
                .get(format!("{}/status/{}", base_url, code))
                .send()
                .await?;
            println!("{}", response.status());
        }
        Commands::Echo { text, wait } => {
            let url = match wait {
                Some(secs) => format!("{}/echo/{}", base_url, secs),
                None => format!("{}/echo", base_url),
            };
            let response = client.post(url).body(text).send().await?;
            println!("{}", ensure_success(response).await?.text().await?);
        }
        Commands::Random { format } => {
            let response = client
                .get(format!("{}/random/{}", base_url, format.as_str()))
                .send()
                .await?;
            println!("{}", ensure_success(response).await?.text().await?);
        }
        Commands::HashPassword { plaintext, cost } => {
            let hashed = bcrypt::hash(plaintext, cost).context("Failed to hash password")?;
            println!("{}", hashed);
        }
    }

    Ok(())
}

async fn ensure_success(response: Response) -> anyhow::Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    anyhow::bail!("Server returned {}: {}", status, body)
}
