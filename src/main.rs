//! Terminal entry point: public portfolio commands plus the interactive
//! admin console loop.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use clap::{Parser, Subcommand};

use foliodesk_lib::api::{basic_token, ApiClient, Gateway, DEFAULT_API_BASE};
use foliodesk_lib::console::{AdminConsole, Mode};
use foliodesk_lib::form::FormValue;
use foliodesk_lib::models::ContactMessagePayload;
use foliodesk_lib::portfolio;
use foliodesk_lib::schema::resource_configs;
use foliodesk_lib::settings::{DiskSettings, Settings, SettingsStore, Theme};
use foliodesk_lib::table::{render_nav, render_table};

#[derive(Parser)]
#[command(name = "foliodesk", version, about = "Portfolio command center")]
struct Cli {
    /// Override the API base URL (also: FOLIODESK_API_BASE, settings file).
    #[arg(long, global = true)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the public portfolio.
    Show,
    /// Send a contact message to the portfolio owner.
    SendMessage {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        message: String,
    },
    /// Verify a credential against the API and store it.
    Login { username: String },
    /// Discard the stored credential.
    Logout,
    /// Open the interactive admin console.
    Admin,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(message) = run(cli).await {
        eprintln!("{message}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let store = DiskSettings::at_default_location().map_err(|e| e.to_string())?;
    let mut settings = store.load().map_err(|e| e.to_string())?;
    let base = cli
        .api_base
        .or_else(|| std::env::var("FOLIODESK_API_BASE").ok())
        .or_else(|| settings.api_base.clone())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

    match cli.command {
        Command::Show => {
            let client = ApiClient::new(&base, None).map_err(|e| e.to_string())?;
            let view = portfolio::load(&client).await;
            print!("{}", portfolio::render(&view));
        }
        Command::SendMessage {
            name,
            email,
            subject,
            message,
        } => {
            let client = ApiClient::new(&base, None).map_err(|e| e.to_string())?;
            let payload = ContactMessagePayload::new(name, email, subject, message);
            match portfolio::send_message(&client, &payload).await {
                Ok(()) => println!("{}", portfolio::MESSAGE_SUCCESS),
                Err(e) => {
                    log::debug!("message submission failed: {e}");
                    return Err(portfolio::MESSAGE_FAILURE.to_string());
                }
            }
        }
        Command::Login { username } => {
            eprint!("Password: ");
            io::stderr().flush().ok();
            let password = read_line().ok_or("No password given")?;
            let token = basic_token(&username, password.trim_end());
            let client = ApiClient::new(&base, Some(token.clone())).map_err(|e| e.to_string())?;
            client.login_check().await.map_err(|e| e.to_string())?;
            settings.admin_auth = Some(token);
            settings.admin_user = Some(username.clone());
            store.save(&settings).map_err(|e| e.to_string())?;
            println!("Signed in as {username}.");
        }
        Command::Logout => {
            settings.admin_auth = None;
            settings.admin_user = None;
            store.save(&settings).map_err(|e| e.to_string())?;
            println!("Signed out.");
        }
        Command::Admin => {
            let Some(token) = settings.admin_auth.clone() else {
                return Err("Not signed in. Run `foliodesk login <username>` first.".to_string());
            };
            let client = ApiClient::new(&base, Some(token)).map_err(|e| e.to_string())?;
            let gateway: Arc<dyn Gateway> = Arc::new(client);
            let store: Arc<dyn SettingsStore> = Arc::new(store);
            let mut console = AdminConsole::new(gateway, store);
            println!("Loading...");
            console.select_resource(resource_configs()[0].key).await;
            repl(&mut console).await;
        }
    }
    Ok(())
}

const HELP: &str = "\
Commands:
  nav                      show resource navigation
  use <resource>           switch to a resource
  list                     show the current item list
  reload                   refetch the list from the API
  new                      start a blank entry
  edit <id>                load an entry into the form
  form                     show the form
  set <field> <value>      edit a form field
  submit                   save the form (create or update)
  clear                    discard edits
  delete <id>              delete an entry (asks for confirmation)
  options <field>          list choices for a relation field
  columns                  show column preferences
  col show|hide <field>    toggle a column
  col width <field> <n>    set a column width
  panel                    toggle the table options panel
  compact                  toggle compact navigation
  width <n>                set the navigation width
  theme light|dark         switch the color theme
  help                     this text
  quit                     leave the console";

async fn repl(console: &mut AdminConsole) {
    print_table(console);
    println!("Type `help` for commands.");

    loop {
        flush_feedback(console);
        print!("foliodesk:{}> ", console.resource().key);
        io::stdout().flush().ok();

        let Some(line) = read_line() else { break };
        let line = line.trim();
        let (cmd, rest) = match line.split_once(' ') {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };

        match cmd {
            "" => {}
            "help" | "?" => println!("{HELP}"),
            "quit" | "exit" | "q" => break,
            "nav" => print!(
                "{}",
                render_nav(resource_configs(), console.resource().key, console.settings())
            ),
            "use" => {
                if rest.is_empty() {
                    println!("Usage: use <resource>");
                } else {
                    println!("Loading...");
                    if console.select_resource(rest).await {
                        print_table(console);
                    } else {
                        println!("Unknown resource: {rest}");
                    }
                }
            }
            "list" | "ls" => print_table(console),
            "reload" => {
                println!("Loading...");
                console.reload().await;
                print_table(console);
            }
            "new" => {
                if console.start_create() {
                    print_form(console);
                } else {
                    println!("Creation is disabled for {}.", console.resource().title);
                }
            }
            "edit" => match rest.parse::<i64>() {
                Ok(id) => {
                    if console.start_edit(id) {
                        print_form(console);
                    } else {
                        println!("No entry with id {id}.");
                    }
                }
                Err(_) => println!("Usage: edit <id>"),
            },
            "form" => print_form(console),
            "set" => match rest.split_once(' ') {
                Some((field, value)) => {
                    if let Err(message) = console.set_field(field, value.trim()) {
                        println!("{message}");
                    }
                }
                None => {
                    // Allow clearing a field with `set <field>`.
                    if rest.is_empty() {
                        println!("Usage: set <field> <value>");
                    } else if let Err(message) = console.set_field(rest, "") {
                        println!("{message}");
                    }
                }
            },
            "submit" | "save" => {
                println!("Saving...");
                console.submit().await;
            }
            "clear" => {
                console.clear();
                print_form(console);
            }
            "delete" | "del" => match rest.parse::<i64>() {
                Ok(id) => {
                    if console.request_delete(id) {
                        print!("Delete this item? (y/n) ");
                        io::stdout().flush().ok();
                        let answer = read_line().unwrap_or_default();
                        if matches!(answer.trim(), "y" | "yes") {
                            console.confirm_delete().await;
                        } else {
                            console.cancel_delete();
                            println!("Cancelled.");
                        }
                    } else if !console.resource().capabilities.delete {
                        println!("Deletion is disabled for {}.", console.resource().title);
                    } else {
                        println!("No entry with id {id}.");
                    }
                }
                Err(_) => println!("Usage: delete <id>"),
            },
            "options" => {
                let options = console.related_options(rest);
                if options.is_empty() {
                    println!("No options for `{rest}`.");
                } else {
                    for option in options {
                        println!("  {:>4}  {}", option.id, option.label);
                    }
                }
            }
            "columns" => print_columns(console),
            "col" => handle_col(console, rest),
            "panel" => {
                console.toggle_options_panel();
                print_columns(console);
            }
            "compact" => {
                console.toggle_compact();
                print!(
                    "{}",
                    render_nav(resource_configs(), console.resource().key, console.settings())
                );
            }
            "width" => match rest.parse::<u16>() {
                Ok(width) => console.set_sidebar_width(width),
                Err(_) => println!("Usage: width <n>"),
            },
            "theme" => match rest {
                "light" => console.set_theme(Theme::Light),
                "dark" => console.set_theme(Theme::Dark),
                _ => println!("Usage: theme light|dark"),
            },
            other => println!("Unknown command: {other}. Type `help`."),
        }
    }
}

fn handle_col(console: &mut AdminConsole, rest: &str) {
    let parts: Vec<&str> = rest.split_whitespace().collect();
    match parts.as_slice() {
        ["show", field] | ["hide", field] => {
            let visible = parts[0] == "show";
            let prefs = console.table_prefs();
            if prefs.is_visible(field) != visible {
                if !console.toggle_column(field) {
                    println!("Unknown field: {field}");
                    return;
                }
            }
            print_columns(console);
        }
        ["width", field, value] => match value.parse::<u16>() {
            Ok(width) => {
                if console.set_column_width(field, width) {
                    print_columns(console);
                } else {
                    println!("Unknown field: {field}");
                }
            }
            Err(_) => println!("Usage: col width <field> <n>"),
        },
        _ => println!("Usage: col show|hide <field> | col width <field> <n>"),
    }
}

fn flush_feedback(console: &mut AdminConsole) {
    for toast in console.drain_toasts() {
        println!("* {toast}");
    }
    if let Some(error) = console.error() {
        println!("! {error}");
    }
}

fn print_table(console: &AdminConsole) {
    let heading = style_heading(console.resource().title, console.settings());
    println!("{heading}");
    print!(
        "{}",
        render_table(console.resource(), &console.table_prefs(), console.items())
    );
}

fn print_form(console: &AdminConsole) {
    let resource = console.resource();
    let title = match console.mode() {
        Mode::Editing(id) => format!("Edit {} #{id}", resource.title),
        Mode::Browsing if resource.capabilities.create => format!("Create {}", resource.title),
        Mode::Browsing => format!("{}: pick an entry with `edit <id>`", resource.title),
    };
    println!("{}", style_heading(&title, console.settings()));

    for field in resource.fields {
        let value = console
            .form()
            .get(field.name)
            .map(FormValue::display)
            .unwrap_or_default();
        let mut line = format!("  {} [{}]", field.name, field.kind.as_str());
        if field.read_only {
            line.push_str(" (server-assigned)");
        }
        line.push_str(&format!(": {value}"));
        if !field.options.is_empty() {
            let choices: Vec<String> = field
                .options
                .iter()
                .map(|option| format!("{}={}", option.value, option.label))
                .collect();
            line.push_str(&format!("  choices: {}", choices.join(", ")));
        }
        if field.options_endpoint.is_some() {
            line.push_str(&format!("  (see `options {}`)", field.name));
        }
        if value.is_empty() {
            if let Some(placeholder) = field.placeholder {
                line.push_str(&format!("  e.g. {placeholder}"));
            }
        }
        println!("{line}");
    }
}

fn print_columns(console: &AdminConsole) {
    let prefs = console.table_prefs();
    if !prefs.show_table_options {
        println!("Table options hidden. Use `panel` to show them.");
        return;
    }
    println!("Columns for {}:", console.resource().title);
    for field in console.resource().fields {
        let mark = if prefs.is_visible(field.name) { "x" } else { " " };
        println!("  [{mark}] {:<20} width {}", field.name, prefs.width(field.name));
    }
}

fn style_heading(text: &str, settings: &Settings) -> String {
    match settings.theme {
        Theme::Dark => format!("\x1b[1m{text}\x1b[0m"),
        Theme::Light => text.to_string(),
    }
}

fn read_line() -> Option<String> {
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line),
        Err(_) => None,
    }
}
