use cidr_subnet::{compute_subnet, parse_request, Config, Function};
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Root};
use std::error::Error;
use std::path::Path;
use tokio::io::AsyncReadExt;

#[derive(Subcommand)]
enum CidrCommand {
    /// Run the function on a JSON request and print the JSON response.
    Run {
        /// Request file, or `-` for stdin.
        #[arg(value_name = "request.json")]
        request: String,
    },

    /// Compute a subnet from literal values only.
    Calc {
        /// Base prefix, e.g. 10.10.0.0/24.
        prefix: String,

        /// Bits to extend the prefix by.
        #[arg(allow_negative_numbers = true)]
        newbits: i64,

        /// Subnet number within the extension.
        #[arg(allow_negative_numbers = true)]
        netnum: i64,
    },
}

#[derive(clap::Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: CidrCommand,
}

fn init_logging(path: &Path) -> Result<(), Box<dyn Error>> {
    if path.exists() {
        log4rs::init_file(path, Default::default())?;
    } else {
        // Keep stdout clean for the response.
        let stderr = ConsoleAppender::builder().target(Target::Stderr).build();
        let config = log4rs::Config::builder()
            .appender(Appender::builder().build("stderr", Box::new(stderr)))
            .build(Root::builder().appender("stderr").build(LevelFilter::Warn))?;
        log4rs::init_config(config)?;
    }
    Ok(())
}

async fn read_request(source: &str) -> Result<String, Box<dyn Error>> {
    let mut json = String::new();
    if source == "-" {
        tokio::io::stdin().read_to_string(&mut json).await?;
    } else {
        json = tokio::fs::read_to_string(source)
            .await
            .map_err(|e| format!("Failed to read {source}: {e}"))?;
    }
    Ok(json)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let config = Config::from_env()?;
    init_logging(&config.log_config)?;
    log::info!("#Start main()");

    let cli = Cli::parse();
    match cli.command {
        CidrCommand::Run { request } => {
            let req = parse_request(&read_request(&request).await?)?;
            let rsp = Function::new(config).run_function(&req);
            println!("{}", serde_json::to_string_pretty(&rsp)?);
            if rsp.is_fatal() {
                std::process::exit(1);
            }
        }
        CidrCommand::Calc {
            prefix,
            newbits,
            netnum,
        } => match compute_subnet(&prefix, newbits, netnum) {
            Ok(cidr) => println!("{cidr}"),
            Err(e) => {
                eprintln!("{}", e.to_string().red());
                std::process::exit(1);
            }
        },
    }
    Ok(())
}
