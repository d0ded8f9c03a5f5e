use clap::Parser;

use apache_config::cli::Cli;
use apache_config::Config;

fn main() {
    let cli = Cli::parse();

    let options = match cli.to_options() {
        Ok(o) => o,
        Err(message) => {
            eprintln!("apacheconfig: {message}");
            std::process::exit(1);
        }
    };

    let config = Config::new(options);

    if cli.json_input {
        let Some(first) = cli.files.first() else {
            eprintln!("apacheconfig: --json-input requires a file argument");
            std::process::exit(1);
        };
        let text = match std::fs::read_to_string(first) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("apacheconfig: cannot read '{first}': {e}");
                std::process::exit(1);
            }
        };
        let json: serde_json::Value = match serde_json::from_str(&text) {
            Ok(v) => v,
            Err(e) => {
                eprintln!("apacheconfig: invalid JSON in '{first}': {e}");
                std::process::exit(1);
            }
        };
        let tree = apache_config::Value::from_serde_json(json);
        println!("{}", serde_json::json!(config.dumps(&tree)));
        return;
    }

    let mut result = apache_config::Value::empty_table();
    for file in &cli.files {
        match config.load(file) {
            Ok(tree) => {
                if let (Some(existing), Some(incoming)) = (result.as_table_mut(), tree.as_table()) {
                    for (k, v) in incoming {
                        existing.insert(k.clone(), v.clone());
                    }
                }
            }
            Err(e) => {
                eprintln!("apacheconfig: {e}");
                std::process::exit(1);
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&result.to_serde_json()).unwrap());
}
