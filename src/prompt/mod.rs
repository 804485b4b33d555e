use std::io::{self, BufRead, Write};
use std::str::FromStr;

/// Prompts until the input parses as `T`. The calculation model only ever
/// receives typed scalar values, never raw strings.
fn prompt_parsed<T: FromStr>(prompt: &str, expectation: &str) -> io::Result<T> {
    let stdin = io::stdin();
    let mut input = String::new();
    loop {
        print!("{prompt}");
        io::stdout().flush()?;

        input.clear();
        let bytes_read = stdin.lock().read_line(&mut input)?;
        if bytes_read == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while prompting",
            ));
        }

        match input.trim().parse::<T>() {
            Ok(value) => return Ok(value),
            Err(_) => println!("Invalid input. Expected {expectation}"),
        }
    }
}

pub fn amount(prompt: &str) -> io::Result<f64> {
    prompt_parsed(prompt, "a dollar amount")
}

pub fn percent(prompt: &str) -> io::Result<f64> {
    prompt_parsed(prompt, "a percentage")
}

pub fn count(prompt: &str) -> io::Result<i32> {
    prompt_parsed(prompt, "a whole number")
}

pub fn yes_no(prompt: &str) -> io::Result<bool> {
    let stdin = io::stdin();
    let mut input = String::new();
    loop {
        print!("{prompt}");
        io::stdout().flush()?;

        input.clear();
        let bytes_read = stdin.lock().read_line(&mut input)?;
        if bytes_read == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while prompting",
            ));
        }

        match input.trim().to_lowercase().as_str() {
            "y" | "yes" | "true" => return Ok(true),
            "n" | "no" | "false" => return Ok(false),
            _ => println!("Invalid input. Expected one of: 'y', 'n', 'yes', 'no', 'true', 'false'"),
        }
    }
}
