use std::io::{self, BufRead, Write};

/// Helper function to read a line from stdin. End of input is an error.
pub fn read_line() -> io::Result<String> {
    read_line_from(&mut io::stdin().lock())
}

/// Read one trimmed line from any reader; `Ok(0)` becomes `UnexpectedEof`
pub fn read_line_from<R: BufRead>(reader: &mut R) -> io::Result<String> {
    let mut input = String::new();
    if reader.read_line(&mut input)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "end of input"));
    }
    Ok(input.trim().to_string())
}

/// Helper function to read a password without echoing it
pub fn read_password() -> io::Result<String> {
    rpassword::read_password()
}

/// Print a prompt without a trailing newline and read the answer
pub fn prompt(label: &str) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    read_line()
}

/// Helper function to prompt for input with confirmation
pub fn prompt_with_confirmation(prompt: &str, confirmation: &str) -> io::Result<bool> {
    println!("{}", prompt);
    print!("{} (y/n): ", confirmation);
    io::stdout().flush()?;

    read_confirmation(&mut io::stdin().lock())
}

/// Closed input never counts as consent
pub fn read_confirmation<R: BufRead>(reader: &mut R) -> io::Result<bool> {
    let answer = read_line_from(reader)?;
    Ok(is_affirmative(&answer))
}

/// An empty answer (just Enter) counts as yes
fn is_affirmative(answer: &str) -> bool {
    let response = answer.trim().to_lowercase();
    response.is_empty() || response == "y" || response == "yes"
}
