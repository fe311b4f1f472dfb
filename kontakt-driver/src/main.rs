use kontakt_driver::config::DashboardConfig;
use kontakt_driver::form::Field;
use kontakt_driver::state::Route;
use kontakt_driver::view::{FormView, ListView};
use kontakt_driver::*;
use kontakt_sqlite::KontaktConnection;
use kontakt_storage_interface::KeyValueStore;
use kontakt_storage_mock::MemoryStore;
use std::cell::RefCell;
use std::path::PathBuf;
use structopt::StructOpt;
use tracing_subscriber::filter::LevelFilter;

fn uncons(input: &str) -> Option<(&str, &str)> {
    let start = input.find(|c: char| !c.is_whitespace())?;
    match input[start..].find(char::is_whitespace) {
        Some(len) => Some((&input[start..start + len], &input[start + len..])),
        None => Some((&input[start..], "")),
    }
}

fn uncons_parse<'a, S, H>(input: &'a str, message: &'static str) -> DriverResult<S, (H, &'a str)>
where
    S: KeyValueStore,
    H: std::str::FromStr,
{
    use DriverError::*;

    let (head, rest) = uncons(input).ok_or(NotFound)?;
    let head = head.parse().map_err(|_| ParseFail(message.into()))?;
    Ok((head, rest))
}

type Command<'a, S> = Box<dyn Fn(&str) -> DriverResult<S, ()> + 'a>;

fn subcommands<'a, S: KeyValueStore>(subcommands: Vec<(&'a str, Command<'a, S>)>) -> Command<'a, S> {
    Box::new(move |input| {
        if let Some((head, rest)) = uncons(input) {
            for (key, f) in subcommands.iter() {
                if head.eq_ignore_ascii_case(key) {
                    return f(rest);
                }
            }

            if head.eq_ignore_ascii_case("help") {
                let keys: Vec<&str> = subcommands.iter().map(|(key, _)| *key).collect();
                println!("available commands: {}", keys.join(", "));
                return Ok(());
            }
        }

        Err(DriverError::NotFound)
    })
}

fn print_list(view: &ListView) {
    match &view.signed_in_as {
        Some(name) => println!("signed in as {}", name),
        None => println!("signed out"),
    }
    if let Some(message) = view.empty_message() {
        println!("{}", message);
    }
    for card in view.cards.iter() {
        let mut controls = vec!["view"];
        if card.can_edit {
            controls.push("edit");
        }
        if card.can_delete {
            controls.push("delete");
        }
        println!(
            "{:>3}. {:<20}\t{}\t{}\t[{}]",
            card.id,
            card.name,
            card.contact,
            card.email,
            controls.join(" ")
        );
    }
    if view.can_add {
        println!("(add) new contact");
    }
}

fn print_form(view: &FormView) {
    println!("{:?}{}", view.mode, if view.read_only { " (read-only)" } else { "" });
    println!("  name:    {}", view.name);
    println!("  contact: {}", view.contact);
    println!("  e-mail:  {}", view.email);
    match view.picture_len {
        Some(len) => println!("  picture: {} bytes", len),
        None => println!("  picture: none"),
    }
    for feedback in view.feedback.iter() {
        println!("  ! {}", feedback);
    }
}

fn show<S: KeyValueStore>(driver: &Driver<S>) -> DriverResult<S, ()> {
    match driver.form_view() {
        Some(view) => print_form(&view),
        None => print_list(&driver.list_view()?),
    }
    if let Some(prompt) = driver.delete_prompt() {
        println!("{} (confirm / dismiss)", prompt);
    }
    Ok(())
}

fn navigate<'a, S: KeyValueStore>(
    driver: &'a RefCell<Driver<S>>,
    to_route: fn(kontakt::ContactId) -> Route,
) -> Command<'a, S> {
    Box::new(move |input: &str| {
        let (id, _rest) = uncons_parse::<S, _>(input, "failed to parse contact id")?;
        let mut driver = driver.borrow_mut();
        let route = driver.navigate(to_route(id))?;
        if route == Route::List {
            println!("contact {} not found", id);
        }
        show(&driver)
    })
}

fn form_commands<'a, S: KeyValueStore>(driver: &'a RefCell<Driver<S>>) -> Vec<(&'a str, Command<'a, S>)> {
    vec![
        (
            "set",
            Box::new(move |input: &str| {
                let (field, rest) = uncons_parse::<S, Field>(input, "expected name, contact or email")?;
                driver.borrow_mut().input(field, rest.trim())
            }) as Command<S>,
        ),
        (
            "blur",
            Box::new(move |input: &str| {
                let (field, _rest) = uncons_parse::<S, Field>(input, "expected name, contact or email")?;
                let mut driver = driver.borrow_mut();
                driver.blur(field)?;
                show(&driver)
            }),
        ),
        (
            "picture",
            Box::new(move |input: &str| {
                let path = PathBuf::from(input.trim());
                driver.borrow_mut().attach_picture(&path)?;
                println!("attached {}", path.display());
                Ok(())
            }),
        ),
        (
            "submit",
            Box::new(move |_input: &str| {
                let mut driver = driver.borrow_mut();
                match driver.submit()? {
                    Some(contact) => println!("saved contact {}", contact.id),
                    None => println!("please fix the form"),
                }
                show(&driver)
            }),
        ),
        (
            "cancel",
            Box::new(move |_input: &str| {
                let mut driver = driver.borrow_mut();
                driver.cancel();
                show(&driver)
            }),
        ),
    ]
}

fn delete_commands<'a, S: KeyValueStore>(driver: &'a RefCell<Driver<S>>) -> Vec<(&'a str, Command<'a, S>)> {
    vec![
        (
            "delete",
            Box::new(move |input: &str| {
                let (id, _rest) = uncons_parse::<S, _>(input, "failed to parse contact id")?;
                let mut driver = driver.borrow_mut();
                driver.open_delete(id)?;
                show(&driver)
            }) as Command<S>,
        ),
        (
            "confirm",
            Box::new(move |_input: &str| {
                let mut driver = driver.borrow_mut();
                let contact = driver.confirm_delete()?;
                println!("deleted {}", contact.name);
                show(&driver)
            }),
        ),
        (
            "dismiss",
            Box::new(move |_input: &str| {
                let mut driver = driver.borrow_mut();
                driver.cancel_delete();
                show(&driver)
            }),
        ),
    ]
}

fn session_commands<'a, S: KeyValueStore>(driver: &'a RefCell<Driver<S>>) -> Vec<(&'a str, Command<'a, S>)> {
    use DriverError::*;

    vec![
        (
            "signin",
            Box::new(move |input: &str| {
                let (username, rest) = uncons(input).ok_or(ParseFail("missing username".into()))?;
                let mut driver = driver.borrow_mut();
                driver.sign_in(username, rest.trim());
                show(&driver)
            }) as Command<S>,
        ),
        (
            "signout",
            Box::new(move |_input: &str| {
                let mut driver = driver.borrow_mut();
                driver.sign_out();
                show(&driver)
            }),
        ),
    ]
}

fn commands<'a, S: KeyValueStore>(driver: &'a RefCell<Driver<S>>) -> Command<'a, S> {
    let mut all: Vec<(&'a str, Command<'a, S>)> = vec![
        (
            "list",
            Box::new(move |_input: &str| {
                let mut driver = driver.borrow_mut();
                driver.navigate(Route::List)?;
                show(&driver)
            }) as Command<S>,
        ),
        ("view", navigate(driver, Route::View)),
        ("edit", navigate(driver, Route::Edit)),
        (
            "add",
            Box::new(move |_input: &str| {
                let mut driver = driver.borrow_mut();
                driver.navigate(Route::Add)?;
                show(&driver)
            }),
        ),
    ];
    all.extend(form_commands(driver));
    all.extend(delete_commands(driver));
    all.extend(session_commands(driver));
    subcommands::<S>(all)
}

fn run<S: KeyValueStore>(mut driver: Driver<S>) -> rustyline::Result<()> {
    driver.subscribe(Box::new(|contacts| {
        log::debug!("collection now holds {} contacts", contacts.len())
    }));
    let driver = RefCell::new(driver);
    if let Err(e) = show(&driver.borrow()) {
        eprintln!("{}", e);
    }
    let commands = commands(&driver);

    let mut rl = rustyline::Editor::<()>::new();
    loop {
        match rl.readline("> ") {
            Ok(line) => {
                rl.add_history_entry(line.as_str());
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match commands(line) {
                    Ok(()) => {}
                    Err(DriverError::NotFound) => eprintln!("unknown command, try 'help'"),
                    Err(e) => eprintln!("{}", e),
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted)
            | Err(rustyline::error::ReadlineError::Eof) => return Ok(()),
            Err(e) => return Err(e),
        }
    }
}

#[derive(StructOpt, Debug)]
struct SqliteOpt {
    /// Database file; defaults to $KONTAKT_DB
    db_path: Option<String>,
}

#[derive(StructOpt, Debug)]
enum Backend {
    Sqlite(SqliteOpt),
    /// Keep contacts in memory for this session only
    Memory,
}

#[derive(StructOpt, Debug)]
struct Opt {
    /// JSON configuration file
    #[structopt(long, parse(from_os_str))]
    config: Option<PathBuf>,
    #[structopt(short, long)]
    verbose: bool,
    #[structopt(subcommand)]
    backend: Backend,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let opt = Opt::from_args();

    tracing_subscriber::fmt()
        .with_max_level(if opt.verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    let config = match &opt.config {
        Some(path) => DashboardConfig::load_from_file(path)?,
        None => DashboardConfig::default(),
    };

    match opt.backend {
        Backend::Sqlite(sqlite) => {
            let db_path = match sqlite.db_path {
                Some(path) => path,
                None => std::env::var("KONTAKT_DB").map_err(|_| "db_path not given")?,
            };
            let conn = KontaktConnection::connect(&db_path)?;
            run(Driver::new(conn, &config))?;
        }
        Backend::Memory => run(Driver::new(MemoryStore::new(), &config))?,
    }

    Ok(())
}
