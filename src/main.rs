use std::io::{self, Write};

use regvm::{Captures, MatchError, compile, match_non_recursive, match_recursive, match_thompson};

fn main() {
    env_logger::init();

    println!("regvm REPL");
    println!("Type an empty pattern to exit.");

    loop {
        print!("regex> ");
        io::stdout().flush().unwrap();
        let mut pattern = String::new();
        if io::stdin().read_line(&mut pattern).is_err() {
            println!("Error reading pattern.");
            continue;
        }
        let pattern = pattern.trim();
        if pattern.is_empty() {
            break;
        }

        let ast = match regvm::parse(pattern) {
            Ok(ast) => ast,
            Err(e) => {
                println!("Regex parse error: {e} at {:?}", e.span());
                continue;
            }
        };
        println!("Parsed as {ast:?}");

        let program = compile(&ast);
        print!("{program}");

        loop {
            println!("Type return to go back to the regex prompt.");
            print!("input> ");
            io::stdout().flush().unwrap();
            let mut input = String::new();
            if io::stdin().read_line(&mut input).is_err() {
                println!("Error reading input.");
                continue;
            }
            let input = input.trim_end_matches(['\r', '\n']);
            if input == "return" {
                break;
            }
            report("recursive", Ok(match_recursive(&program, input)));
            report("backtrack", match_non_recursive(&program, input));
            report("pike vm", Ok(match_thompson(&program, input)));
        }
    }
}

fn report(engine: &str, result: Result<Option<Captures<'_>>, MatchError>) {
    match result {
        Ok(Some(caps)) => {
            println!("{engine}: matched {:?}", caps.offsets());
            for (i, group) in caps.iter().enumerate() {
                match group {
                    Some(m) => println!("  Group {i}: {:?} {:?}", m.range(), m.as_str()),
                    None => println!("  Group {i}: None"),
                }
            }
        }
        Ok(None) => println!("{engine}: no match."),
        Err(e) => println!("{engine}: {e}"),
    }
}
