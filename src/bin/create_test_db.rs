use std::{env, error::Error, path::Path, process::exit};

use clap::Parser;
use rusqlite::Connection;
use time::OffsetDateTime;

use thrifty_rs::{DEFAULT_TOKEN_DURATION, JwtKeys, create_user, encode_token, initialize_db};

/// A utility for creating a test database for the REST API server of thrifty_rs.
///
/// The printed token is signed with the environment variable `SECRET`, so
/// start the server with the same secret.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The balance the demo user starts with.
    #[arg(long, default_value_t = 1000.0)]
    balance: f64,
}

/// Create a database with a demo user and print a bearer token for them.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    if output_path.extension().is_none_or(|extension| extension.is_empty()) {
        eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
        exit(1);
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    let secret = env::var("SECRET").map_err(|_| "The environment variable 'SECRET' must be set")?;

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user...");
    let user = create_user("Demo User", "demo@example.com", args.balance, &conn)?;

    let token = encode_token(
        user.id,
        &JwtKeys::new(&secret).encoding_key,
        OffsetDateTime::now_utc(),
        DEFAULT_TOKEN_DURATION,
    )?;

    println!("Success! Use this bearer token to act as {}:\n{token}", user.email);

    Ok(())
}
