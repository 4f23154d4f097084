use lexi_types::{AppEvent, Credentials, SortKey};

/// A parsed line of terminal input
#[derive(Debug)]
pub enum Command {
    Event(AppEvent),
    Help,
    WhoAmI,
    Quit,
}

pub const HELP: &str = "\
Commands:
  <word>                      look up a word
  /bookmark                   bookmark or un-bookmark the current word
  /bookmarks                  show your bookmarks
  /sort date|word             sort bookmarks (again to flip the order)
  /page N, /next, /prev       move between bookmark pages
  /open N                     show bookmark N of the current page
  /remove N                   delete bookmark N of the current page
  /login <email> <password>   sign in with a password
  /login                      sign in through the browser
  /token <access> [refresh]   finish a browser sign-in
  /logout                     sign out
  /whoami                     show the signed-in user
  /help                       show this help
  /quit                       exit";

/// `Ok(None)` for blank lines, `Err` with a usage hint for malformed commands
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Some(Command::Event(AppEvent::Search(line.to_string()))));
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    let event = match (name, args.as_slice()) {
        ("help" | "h" | "?", _) => return Ok(Some(Command::Help)),
        ("quit" | "exit" | "q", _) => return Ok(Some(Command::Quit)),
        ("whoami", _) => return Ok(Some(Command::WhoAmI)),
        ("search" | "s", []) => return Err("usage: /search <word>".to_string()),
        ("search" | "s", words) => AppEvent::Search(words.join(" ")),
        ("bookmark" | "b", []) => AppEvent::ToggleBookmark,
        ("bookmarks" | "list", []) => AppEvent::ShowBookmarks,
        ("sort", ["date" | "created" | "created_at"]) => AppEvent::SortBookmarks(SortKey::CreatedAt),
        ("sort", ["word"]) => AppEvent::SortBookmarks(SortKey::Word),
        ("sort", _) => return Err("usage: /sort date|word".to_string()),
        ("page", [n]) => AppEvent::GoToPage(parse_number(n)?),
        ("next", []) => AppEvent::NextPage,
        ("prev", []) => AppEvent::PrevPage,
        ("open", [n]) => AppEvent::SelectBookmark(parse_number(n)?),
        ("remove" | "rm", [n]) => AppEvent::RemoveBookmark(parse_number(n)?),
        ("login", []) => AppEvent::RequestOAuthUrl,
        ("login", [email, password]) => AppEvent::SignIn(Credentials::Password {
            email: email.to_string(),
            password: password.to_string(),
        }),
        ("login", _) => return Err("usage: /login [<email> <password>]".to_string()),
        ("token", [access]) => AppEvent::SignIn(Credentials::Tokens {
            access_token: access.to_string(),
            refresh_token: None,
        }),
        ("token", [access, refresh]) => AppEvent::SignIn(Credentials::Tokens {
            access_token: access.to_string(),
            refresh_token: Some(refresh.to_string()),
        }),
        ("logout", []) => AppEvent::SignOut,
        _ => return Err(format!("unknown command /{rest}, try /help")),
    };

    Ok(Some(Command::Event(event)))
}

fn parse_number(raw: &str) -> Result<usize, String> {
    raw.parse()
        .map_err(|_| format!("expected a number, got {raw:?}"))
}
