// src/modules/auth/user_interface.rs
use std::io;

use super::errors::LoginError;
use super::store::CredentialStore;
use crate::modules::storage::StorageBackend;
use crate::modules::utils::io::{read_line, read_password};
use crate::modules::utils::time::{format_duration_millis, millis_to_local};
use crate::RESET_TOKEN_DURATION_MS;

/// Outcome of one trip through the initial menu
#[derive(Debug)]
pub enum MainAuthResult {
    Success(String), // Logged in as this email
    Back,            // Show the menu again
    Exit,            // Leave the program
    Error(String),   // Show the message, then the menu again
}

/// Result of a sub-flow started from the menu
#[derive(Debug)]
pub enum AuthFlowResult {
    Back,
    LoggedIn(String), // Account ready, session starts as this email
    Success(String),
    Error(String),
}

/// Function to show initial options when starting the program
pub fn show_initial_options() {
    println!("\n=== Welcome to Links-in ===");
    println!("1. Login                  (or type 'login')");
    println!("2. Sign up                (or type 'signup')");
    println!("3. Forgot password        (or type 'forgot')");
    println!("4. Exit                   (or type 'exit')");
    println!("\nEnter your choice         (1-4 or command):");
}

/// Map a menu answer to the flow it starts
pub fn parse_menu_choice(choice: &str) -> Option<&'static str> {
    match choice.trim().to_lowercase().as_str() {
        "1" | "login" => Some("login"),
        "2" | "signup" | "register" => Some("signup"),
        "3" | "forgot" => Some("forgot"),
        "4" | "exit" | "quit" => Some("exit"),
        _ => None,
    }
}

/// Main authentication loop. Returns the logged-in email, or `None` when the user exits.
pub fn main_auth_flow<B: StorageBackend>(store: &CredentialStore<B>) -> Option<String> {
    loop {
        show_initial_options();

        let choice = match read_line() {
            Ok(input) => input,
            Err(e) => {
                println!("Error reading input: {}", e);
                return None;
            }
        };

        let result = match parse_menu_choice(&choice) {
            Some("login") => match authenticate_user(store) {
                Some(email) => MainAuthResult::Success(email),
                None => MainAuthResult::Back,
            },
            Some("signup") => match handle_interactive_registration(store) {
                Ok(AuthFlowResult::LoggedIn(email)) => {
                    println!("\nAccount created. Welcome, {}!", email);
                    MainAuthResult::Success(email)
                }
                Ok(AuthFlowResult::Success(msg)) => {
                    println!("\n{}", msg);
                    MainAuthResult::Back
                }
                Ok(AuthFlowResult::Back) => MainAuthResult::Back,
                Ok(AuthFlowResult::Error(e)) => MainAuthResult::Error(e),
                Err(e) => MainAuthResult::Error(format!("Sign up failed: {}", e)),
            },
            Some("forgot") => match handle_forgot_password(store) {
                AuthFlowResult::Back | AuthFlowResult::LoggedIn(_) => MainAuthResult::Back,
                AuthFlowResult::Success(msg) => {
                    println!("\n{}", msg);
                    MainAuthResult::Back
                }
                AuthFlowResult::Error(e) => MainAuthResult::Error(e),
            },
            Some(_) => MainAuthResult::Exit,
            None => MainAuthResult::Error(
                "Invalid choice. Please enter a number (1-4) or command (login/signup/forgot/exit)."
                    .to_string(),
            ),
        };

        match result {
            MainAuthResult::Success(email) => return Some(email),
            MainAuthResult::Back => continue,
            MainAuthResult::Exit => {
                println!("Goodbye!");
                return None;
            }
            MainAuthResult::Error(msg) => {
                println!("\n{}", msg);
                continue;
            }
        }
    }
}

/// Prompt for email and password until they check out or the user backs out
pub fn authenticate_user<B: StorageBackend>(store: &CredentialStore<B>) -> Option<String> {
    println!("\nPlease enter your email");
    println!("(type 'back' to return to menu):");

    loop {
        let email = match read_line() {
            Ok(input) => input,
            Err(e) => {
                println!("Error reading input: {}", e);
                return None;
            }
        };

        if email.eq_ignore_ascii_case("back") {
            println!("Returning to main menu...");
            return None;
        }
        if email.is_empty() {
            println!("Please enter your email address");
            continue;
        }

        println!("Enter password:");
        let password = match read_password() {
            Ok(pwd) => pwd,
            Err(e) => {
                println!("Error reading password: {}", e);
                return None;
            }
        };
        if password.is_empty() {
            println!("Please enter your password");
            println!("\nPlease enter your email (or 'back'):");
            continue;
        }

        match store.verify_credentials(&email, &password) {
            Ok(()) => {
                println!("\nWelcome, {}!", email);
                return Some(email);
            }
            Err(LoginError::Unknown) => {
                println!("{}", LoginError::Unknown);
                return None;
            }
            Err(reason) => {
                println!("{}", reason);
                println!("\nPlease enter your email (or 'back'):");
            }
        }
    }
}

/// Sign-up form; a new account is logged straight in
pub fn handle_interactive_registration<B: StorageBackend>(
    store: &CredentialStore<B>,
) -> io::Result<AuthFlowResult> {
    println!("\n=== Sign Up ===");
    println!("Enter your email (or 'back' to return to menu):");
    let email = read_line()?;
    if email.eq_ignore_ascii_case("back") {
        return Ok(AuthFlowResult::Back);
    }

    println!("Enter password (at least {} characters):", crate::MIN_PASSWORD_LENGTH);
    let password = read_password()?;
    println!("Confirm password:");
    let confirm_password = read_password()?;

    Ok(complete_signup(store, &email, &password, &confirm_password))
}

/// Validate every rule first, then register
pub fn complete_signup<B: StorageBackend>(
    store: &CredentialStore<B>,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> AuthFlowResult {
    if let Err(e) = store.validate_signup(email, password, confirm_password) {
        return AuthFlowResult::Error(e.to_string());
    }

    match store.register(email, password) {
        Ok(()) => AuthFlowResult::LoggedIn(email.to_string()),
        Err(e) => AuthFlowResult::Error(e.to_string()),
    }
}

/// Two-phase reset. With no delivery channel the token is shown directly.
pub fn handle_forgot_password<B: StorageBackend>(store: &CredentialStore<B>) -> AuthFlowResult {
    println!("\n=== Reset Password ===");
    println!("Please enter your email address (or 'back' to return to menu):");

    let email = match read_line() {
        Ok(input) if input.eq_ignore_ascii_case("back") => return AuthFlowResult::Back,
        Ok(input) => input,
        Err(e) => return AuthFlowResult::Error(format!("Error reading input: {}", e)),
    };

    let ticket = match store.request_password_reset(&email) {
        Ok(ticket) => ticket,
        Err(e) => return AuthFlowResult::Error(e.to_string()),
    };

    println!("\nPassword reset token generated successfully.");
    println!("Demo mode: no email is sent, your reset token is {}", ticket.token);
    println!(
        "It is valid for {} (until {}).",
        format_duration_millis(RESET_TOKEN_DURATION_MS),
        millis_to_local(ticket.expires_at)
    );

    println!("\nEnter the reset token:");
    let token = match read_line() {
        Ok(input) => input,
        Err(e) => return AuthFlowResult::Error(format!("Error reading input: {}", e)),
    };

    let new_password = match get_new_password() {
        Ok(password) => password,
        Err(e) => return AuthFlowResult::Error(e),
    };

    match store.reset_password(&email, &token, &new_password) {
        Ok(()) => AuthFlowResult::Success(
            "Password reset successful. Please login with your new password.".to_string(),
        ),
        Err(e) => AuthFlowResult::Error(e.to_string()),
    }
}

fn get_new_password() -> Result<String, String> {
    println!("Enter new password:");
    let new_password = read_password().map_err(|e| format!("Error reading password: {}", e))?;

    println!("Confirm new password:");
    let confirm_password =
        read_password().map_err(|e| format!("Error reading password: {}", e))?;

    if new_password != confirm_password {
        return Err("Passwords do not match".to_string());
    }
    Ok(new_password)
}
