use std::panic;
use std::process;
use std::rc::Rc;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use scam::debug::Describe;
use scam::primitives::primitives;
use scam::{Environment, RunConfig, make_root_env, run_in};

fn main() {
    let result = panic::catch_unwind(|| {
        run_repl();
    });

    if let Err(panic_info) = result {
        eprintln!("The REPL encountered an unexpected error and must exit.");

        if let Some(msg) = panic_info.downcast_ref::<&str>() {
            eprintln!("Error: {msg}");
        } else if let Some(msg) = panic_info.downcast_ref::<String>() {
            eprintln!("Error: {msg}");
        } else {
            eprintln!("Error: Unknown panic occurred");
        }

        process::exit(1);
    }
}

fn run_repl() {
    println!("scam interactive interpreter");
    println!("Enter expressions like: (+ 1 2)");
    println!("Type :help for more commands, or Ctrl+C to exit.");
    println!();

    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(err) => {
            eprintln!("Could not initialize REPL: {err}");
            return;
        }
    };
    let env = make_root_env();

    loop {
        match rl.readline("scam> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                match line {
                    ":help" => {
                        print_help();
                        continue;
                    }
                    ":env" => {
                        print_environment(&env);
                        continue;
                    }
                    ":quit" | ":exit" => {
                        println!("Goodbye!");
                        break;
                    }
                    _ => {}
                }

                // Each line is one program; definitions persist in `env`
                match run_in(line, &env, RunConfig::default()) {
                    Ok(result) => println!("{result}"),
                    Err(e) => println!("Error: {e}"),
                }
            }

            Err(ReadlineError::Eof | ReadlineError::Interrupted) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                println!("Error: {err:?}");
                break;
            }
        }
    }
}

fn print_help() {
    println!("scam interpreter:");
    println!("  :help      - Show this help message");
    println!("  :env       - Show current environment bindings");
    println!("  :quit      - Exit the interpreter");
    println!("  :exit      - Exit the interpreter");
    println!("  Ctrl+C     - Exit the interpreter");
    println!();
    println!("Language:");
    println!("  Numbers: 42, -3.5");
    println!("  Strings: \"hello world\" (no escapes)");
    println!("  Booleans: true, false (only false is falsy)");
    println!("  Arithmetic: +, -, *, /");
    println!("  Comparison: ==, <, >");
    println!("  Special forms: define, begin, if, lambda");
    println!();
    println!("Examples:");
    println!("  (+ 1 2 3)");
    println!("  (define add1 (lambda (a) (+ a 1)))");
    println!("  (add1 41)");
    println!("  (if (< 1 2) \"yes\" \"no\")");
    println!();
}

fn print_environment(env: &Rc<Environment>) {
    let mut bindings = env.local_bindings();

    // The oldest entries are the ones `make_root_env` installed
    let builtin_count = primitives().len() + 2;
    let builtins = bindings.split_off(bindings.len().saturating_sub(builtin_count));
    let user_defined = bindings;

    println!("Built-in bindings ({}):", builtins.len());
    let mut col = 0;
    for (name, _) in builtins.iter().rev() {
        print!("  {name:<15}");
        col += 1;
        if col % 4 == 0 {
            println!();
        }
    }
    if col % 4 != 0 {
        println!();
    }
    println!();

    if user_defined.is_empty() {
        println!("No user-defined values.");
        return;
    }

    // Newest first, so a shadowed definition is listed after the live one
    println!("User-defined values ({}):", user_defined.len());
    for (name, value) in user_defined {
        println!("  {name} = {}", Describe(&value));
    }
}
