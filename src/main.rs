use clap::{Arg, Command};
use htmlpl::runner;
use htmlpl::runtime::ConsoleRuntime;
use std::fs;
use std::path::Path;

fn main() {
    let matches = Command::new("htmlpl")
        .about("An interpreter for programs written as HTML markup")
        .arg(
            Arg::new("file")
                .help("The program file to execute")
                .value_name("FILE")
                .required(true)
                .index(1),
        )
        .get_matches();

    let file_path = matches.get_one::<String>("file").unwrap();
    run_file(file_path);
}

fn run_file(path: &str) {
    let path = Path::new(path);

    if !path.exists() {
        eprintln!("Error: File '{}' not found", path.display());
        std::process::exit(1);
    }

    match fs::read_to_string(path) {
        Ok(source) => {
            let mut runtime = ConsoleRuntime;
            if !runner::run(&source, path.to_str(), &mut runtime) {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    }
}
