// src/modules/links/user_interface.rs
use clap::{Arg, ArgAction, ArgMatches, Command};
use itertools::Itertools;

use super::model::{validate_link_input, Link, NewLink};
use super::storage::LinkStore;
use crate::modules::storage::StorageBackend;
use crate::modules::utils::io::{prompt, prompt_with_confirmation, read_line};

/// Clap matcher for the commands typed inside a session
pub fn session_command() -> Command {
    Command::new("links")
        .about("Link management commands")
        .subcommand(
            Command::new("list")
                .about("List saved links")
                .arg(
                    Arg::new("favorites")
                        .long("favorites")
                        .help("Only show favorite links")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("sort")
                        .long("sort")
                        .help("Sort links by name or id")
                        .value_name("SORT"),
                ),
        )
        .subcommand(Command::new("add").about("Add a new link"))
        .subcommand(
            Command::new("edit")
                .about("Edit the name and url of a link")
                .arg(Arg::new("id").help("Id of the link to edit").required(true)),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a link")
                .arg(Arg::new("id").help("Id of the link to delete").required(true)),
        )
        .subcommand(
            Command::new("fav")
                .about("Toggle the favorite flag of a link")
                .arg(Arg::new("id").help("Id of the link").required(true)),
        )
        .subcommand(Command::new("help").about("Show available commands"))
        .subcommand(Command::new("logout").about("End the session"))
        .disable_help_subcommand(true)
        .no_binary_name(true)
}

/// Command loop for a logged-in user; returns on logout or end of input
pub fn handle_authenticated_session<B: StorageBackend>(store: &LinkStore<B>, email: &str) {
    println!("\nLogged in as {}. Type 'help' to see available commands.", email);

    loop {
        println!("\nEnter command (or 'help' for available commands):");
        let input = match read_line() {
            Ok(input) => input,
            Err(e) => {
                println!("Error reading input: {}", e);
                return;
            }
        };

        let args = input.split_whitespace().collect::<Vec<_>>();
        if args.is_empty() {
            continue;
        }

        let matches = match session_command().try_get_matches_from(args) {
            Ok(matches) => matches,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match matches.subcommand() {
            Some(("logout", _)) => {
                println!("Successfully logged out.");
                return;
            }
            Some(("help", _)) => show_help_information(),
            Some(("list", sub_matches)) => handle_list_command(sub_matches, store),
            Some(("add", _)) => handle_add_command(store),
            Some(("edit", sub_matches)) => handle_edit_command(sub_matches, store),
            Some(("delete", sub_matches)) => handle_delete_command(sub_matches, store),
            Some(("fav", sub_matches)) => handle_favorite_command(sub_matches, store),
            _ => println!("Unknown command. Use 'help' for usage information."),
        }
    }
}

pub fn show_help_information() {
    println!("\nAvailable commands:");
    println!("  list [--favorites] [--sort name|id]   Show saved links");
    println!("  add                                   Add a new link");
    println!("  edit <id>                             Change a link's name and url");
    println!("  delete <id>                           Remove a link");
    println!("  fav <id>                              Toggle favorite");
    println!("  logout                                End the session");
}

/// Filter and order links for display. Unknown sort keys keep stored order.
pub fn select_links(links: Vec<Link>, favorites_only: bool, sort: Option<&str>) -> Vec<Link> {
    let filtered = links
        .into_iter()
        .filter(|link| !favorites_only || link.favorite);

    match sort {
        Some("name") => filtered
            .sorted_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .collect(),
        Some("id") => filtered
            .sorted_by(|a, b| id_sort_key(&a.id).cmp(&id_sort_key(&b.id)))
            .collect(),
        _ => filtered.collect(),
    }
}

/// Numeric ids order by value; anything else goes after them, by text
fn id_sort_key(id: &str) -> (bool, u64, &str) {
    match id.parse::<u64>() {
        Ok(value) => (false, value, id),
        Err(_) => (true, 0, id),
    }
}

/// Handle the 'list' command
pub fn handle_list_command<B: StorageBackend>(sub_matches: &ArgMatches, store: &LinkStore<B>) {
    let favorites_only = sub_matches.get_flag("favorites");
    let sort = sub_matches.get_one::<String>("sort").map(String::as_str);

    let links = select_links(store.load(), favorites_only, sort);
    if links.is_empty() {
        println!("No links saved yet.");
        return;
    }

    for link in links {
        println!("{}", link.display_line());
    }
}

/// Handle the 'add' command
pub fn handle_add_command<B: StorageBackend>(store: &LinkStore<B>) {
    let (name, url) = match read_link_fields(None) {
        Some(fields) => fields,
        None => return,
    };

    let link = store.add_link(NewLink::new(name, url));
    println!("Link \"{}\" added with id {}.", link.name, link.id);
}

/// Handle the 'edit' command
pub fn handle_edit_command<B: StorageBackend>(sub_matches: &ArgMatches, store: &LinkStore<B>) {
    let id = match sub_matches.get_one::<String>("id") {
        Some(id) => id,
        None => return,
    };

    let existing = match store.get_link(id) {
        Some(link) => link,
        None => {
            println!("Link not found");
            return;
        }
    };

    let (name, url) = match read_link_fields(Some(&existing)) {
        Some(fields) => fields,
        None => return,
    };

    match store.edit_link(id, &name, &url) {
        Ok(link) => println!("Link \"{}\" updated!", link.name),
        Err(e) => println!("{}", e),
    }
}

/// Handle the 'delete' command
pub fn handle_delete_command<B: StorageBackend>(sub_matches: &ArgMatches, store: &LinkStore<B>) {
    let id = match sub_matches.get_one::<String>("id") {
        Some(id) => id,
        None => return,
    };

    let link = match store.get_link(id) {
        Some(link) => link,
        None => {
            println!("Link '{}' not found. Use 'list' to see saved links.", id);
            return;
        }
    };

    let question = format!("About to delete {}", link.display_line());
    match prompt_with_confirmation(&question, "Are you sure?") {
        Ok(true) => {
            store.delete_link(id);
            println!("Link deleted: {}", link.name);
        }
        Ok(false) => println!("Link deletion cancelled."),
        Err(e) => println!("Error reading input: {}", e),
    }
}

/// Handle the 'fav' command
pub fn handle_favorite_command<B: StorageBackend>(sub_matches: &ArgMatches, store: &LinkStore<B>) {
    let id = match sub_matches.get_one::<String>("id") {
        Some(id) => id,
        None => return,
    };

    if store.get_link(id).is_none() {
        println!("Link not found");
        return;
    }

    store.toggle_favorite(id);
    if let Some(link) = store.get_link(id) {
        println!("{}", link.display_line());
    }
}

/// Read name and url, defaulting to the current values when editing
fn read_link_fields(existing: Option<&Link>) -> Option<(String, String)> {
    let name_label = match existing {
        Some(link) => format!("Link name [{}]: ", link.name),
        None => "Link name (e.g., My Favorite Blog): ".to_string(),
    };
    let url_label = match existing {
        Some(link) => format!("Link URL [{}]: ", link.url),
        None => "Link URL (e.g., https://www.example.com): ".to_string(),
    };

    let (name, url) = match (prompt(&name_label), prompt(&url_label)) {
        (Ok(name), Ok(url)) => (name, url),
        (Err(e), _) | (_, Err(e)) => {
            println!("Error reading input: {}", e);
            return None;
        }
    };

    let (name, url) = match existing {
        Some(link) => (
            if name.is_empty() { link.name.clone() } else { name },
            if url.is_empty() { link.url.clone() } else { url },
        ),
        None => (name, url),
    };

    match validate_link_input(&name, &url) {
        Ok(()) => Some((name, url)),
        Err(e) => {
            println!("{}", e);
            None
        }
    }
}
