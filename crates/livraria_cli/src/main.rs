//! Command-line front end for the catalog.
//!
//! # Responsibility
//! - Bootstrap directories and logging, then run one catalog command.
//! - Print results and backup warnings; never touch storage directly.

use livraria_core::{
    core_version, init_logging, level_from_env, BookValidationError, CatalogError, CatalogService,
    LibraryConfig, MutationOutcome, NewBook,
};
use log::error;
use std::process::ExitCode;

const USAGE: &str = "usage: livraria <command>

commands:
  init                                 create the catalog schema
  add <title> <author> <year> <price>  add a book
  list                                 list all books
  update-price <title> <price>         set the price of every book with this title
  remove <title>                       remove every book with this title
  by-author <author>                   list titles by this exact author
  export                               write exports/livros_exportados.csv
  import                               read exports/livros_importados.csv
  backup                               snapshot the database now
  version                              print the core version";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    };
    if command == "version" {
        println!("livraria_core version={}", core_version());
        return ExitCode::SUCCESS;
    }

    let config = LibraryConfig::from_env();
    if let Err(err) = config.ensure_dirs() {
        eprintln!("failed to create catalog directories: {err}");
        return ExitCode::FAILURE;
    }
    if let Err(err) = init_logging(&level_from_env(), &config.log_dir) {
        eprintln!("warning: {err}");
    }

    let service = CatalogService::new(config);
    let result = service
        .initialize()
        .map_err(CliError::from)
        .and_then(|()| run(&service, command, &args[1..]));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Usage) => {
            eprintln!("{USAGE}");
            ExitCode::FAILURE
        }
        Err(CliError::Catalog(err)) => {
            error!("event=cli_command module=cli status=error command={command} error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

enum CliError {
    Usage,
    Catalog(CatalogError),
}

impl From<CatalogError> for CliError {
    fn from(value: CatalogError) -> Self {
        Self::Catalog(value)
    }
}

fn run(service: &CatalogService, command: &str, args: &[String]) -> Result<(), CliError> {
    match (command, args) {
        ("init", []) => println!("catalog ready at {}", service.config().db_path().display()),
        ("add", [title, author, year, price]) => {
            let book = NewBook::parse(title, author, year, price).map_err(CatalogError::from)?;
            let outcome = service.add(&book)?;
            println!("added book {}", outcome.value);
            report_backup(&outcome);
        }
        ("list", []) => {
            let books = service.list_all()?;
            if books.is_empty() {
                println!("catalog is empty");
            }
            for book in books {
                println!(
                    "Id -> {} | Título -> {} | Autor -> {} | Ano -> {} | Preço: {}",
                    book.id, book.title, book.author, book.publication_year, book.price
                );
            }
        }
        ("update-price", [title, price]) => {
            let outcome = service.update_price(title, parse_price(price)?)?;
            println!("updated {} book(s)", outcome.value);
            report_backup(&outcome);
        }
        ("remove", [title]) => {
            let outcome = service.delete_by_title(title)?;
            println!("removed {} book(s)", outcome.value);
            report_backup(&outcome);
        }
        ("by-author", [author]) => {
            let titles = service.find_by_author(author)?;
            if titles.is_empty() {
                println!("no books found for author {author}");
            } else {
                println!("books by {author}:");
                for title in titles {
                    println!("- {title}");
                }
            }
        }
        ("export", []) => {
            let summary = service.export_default()?;
            println!("exported {} book(s) to {}", summary.rows, summary.path.display());
        }
        ("import", []) => {
            let outcome = service.import_default()?;
            println!("imported {} book(s)", outcome.value);
            report_backup(&outcome);
        }
        ("backup", []) => {
            let artifact = service.backup_now()?;
            println!("backup written: {}", artifact.display());
        }
        _ => return Err(CliError::Usage),
    }
    Ok(())
}

fn parse_price(text: &str) -> Result<f64, CatalogError> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| BookValidationError::InvalidPrice(text.to_string()).into())
}

fn report_backup<T>(outcome: &MutationOutcome<T>) {
    match &outcome.backup {
        Ok(artifact) => println!("backup written: {}", artifact.display()),
        Err(warning) => eprintln!("warning: {warning}"),
    }
}
