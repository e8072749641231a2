// CLI module - command-line argument parsing and handlers
//
// Without a subcommand fichegen starts the TUI. Subcommands drive the same
// controller headlessly: each one issues its operation, runs every follow-up
// reload to completion, then prints the result and the alert it produced.

use crate::catalog;
use crate::config::{Config, VERSION};
use crate::controller::{AlertKind, Collection, Controller};
use crate::demo::{DEMO_PASSWORD, DEMO_USERNAME};
use crate::export;
use crate::form::AuthMode;
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

/// fichegen - product sheet generator client
#[derive(Parser)]
#[command(name = "fichegen")]
#[command(version = VERSION)]
#[command(about = "Generate e-commerce product sheets from a form or an EAN barcode", long_about = None)]
pub struct Cli {
    /// Run against an in-process mock backend (no server needed)
    #[arg(long, global = true)]
    pub demo: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Open config file in $EDITOR
        #[arg(long)]
        edit: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Log in and store the session
    Login {
        username: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account and store the session
    Register {
        username: String,
        email: String,
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// List products
    Products {
        #[arg(long)]
        limit: Option<u32>,
        /// Filter on title or brand
        #[arg(long)]
        search: Option<String>,
    },

    /// List product sheets
    Sheets {
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Show dashboard counters
    Stats,

    /// Generate a product (and its sheet) from an EAN code
    Generate {
        ean: String,
        /// Only create the product
        #[arg(long)]
        no_sheet: bool,
    },

    /// Generate a sheet for an existing product
    Sheet { product_id: String },

    /// Delete a product and its sheets
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Export a sheet to the export directory
    Export {
        sheet_id: String,
        #[arg(long, default_value = "prestashop")]
        format: String,
    },

    /// Create a product from the manual form fields
    Create(CreateArgs),

    /// Upload an image and print its URL
    Upload { path: PathBuf },

    /// List the sizes offered for a category and gender
    Sizes { category: String, gender: String },
}

#[derive(clap::Args)]
pub struct CreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    brand: String,
    #[arg(long)]
    category: String,
    #[arg(long)]
    gender: String,
    #[arg(long)]
    price: String,
    #[arg(long)]
    old_price: Option<String>,
    #[arg(long, default_value = "")]
    sku: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "")]
    material: String,
    #[arg(long, default_value = "")]
    season: String,
    /// Repeat for each feature
    #[arg(long = "feature")]
    features: Vec<String>,
    /// Repeat for each size
    #[arg(long = "size")]
    sizes: Vec<String>,
    /// Repeat for each color
    #[arg(long = "color")]
    colors: Vec<String>,
    /// Image file uploaded before submission
    #[arg(long)]
    image: Option<PathBuf>,
    /// Also write the HTML preview
    #[arg(long)]
    html: bool,
    /// Also write the JSON preview
    #[arg(long)]
    json: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Config subcommand (no backend involved)
// ─────────────────────────────────────────────────────────────────────────────

pub fn handle_config(show: bool, reset: bool, edit: bool, path: bool) {
    if path {
        handle_config_path();
    } else if show {
        handle_config_show();
    } else if reset {
        handle_config_reset();
    } else if edit {
        handle_config_edit();
    } else {
        println!("Usage: fichegen config [--show|--reset|--edit|--path]");
        println!();
        println!("Options:");
        println!("  --show    Display effective configuration");
        println!("  --reset   Reset config file to defaults");
        println!("  --edit    Open config file in $EDITOR");
        println!("  --path    Show config file path");
    }
}

fn handle_config_path() {
    match Config::config_path() {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!("Error: Could not determine config path");
            std::process::exit(1);
        }
    }
}

fn handle_config_show() {
    let config = Config::from_env();

    println!("# Effective configuration (env > file > defaults)");
    println!();
    print!("{}", config.to_toml());

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

fn handle_config_reset() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    if path.exists()
        && !confirm(&format!(
            "Config file exists at {}. Overwrite?",
            path.display()
        ))
    {
        println!("Aborted.");
        return;
    }

    if let Err(e) = Config::default().save() {
        eprintln!("Error writing config: {}", e);
        std::process::exit(1);
    }

    println!("Config reset to defaults: {}", path.display());
}

fn handle_config_edit() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    if !path.exists() {
        Config::ensure_config_exists();
        println!("Created new config file: {}", path.display());
    }

    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(windows) {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        });

    println!("Opening {} with {}", path.display(), editor);

    match Command::new(&editor).arg(&path).status() {
        Ok(s) if s.success() => {}
        Ok(s) => {
            eprintln!("Editor exited with status: {}", s);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to launch editor '{}': {}", editor, e);
            eprintln!("Set $EDITOR environment variable to your preferred editor");
            std::process::exit(1);
        }
    }
}

/// `[y/N]` prompt on stderr
fn confirm(question: &str) -> bool {
    eprint!("{} [y/N] ", question);
    let _ = std::io::stderr().flush();

    let mut input = String::new();
    if std::io::stdin().read_line(&mut input).is_err() {
        return false;
    }
    matches!(input.trim().to_lowercase().as_str(), "y" | "o" | "yes" | "oui")
}

fn read_password() -> Result<String> {
    eprint!("Mot de passe : ");
    let _ = std::io::stderr().flush();
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Backend subcommands
// ─────────────────────────────────────────────────────────────────────────────

/// Run one backend subcommand to completion
pub async fn run(command: Commands, c: &mut Controller, demo: bool) -> Result<()> {
    // Drop the restore loads: each command fetches only what it prints
    let _ = c.restore();
    if demo && !c.is_authenticated() {
        c.login_form.username = DEMO_USERNAME.to_string();
        c.login_form.password = DEMO_PASSWORD.to_string();
        let pending = c.login();
        c.drive(pending).await;
        c.alert = None;
    }

    match command {
        Commands::Config { .. } => Ok(()),

        Commands::Login { username, password } => {
            authenticate(c, AuthMode::Login, username, String::new(), password).await
        }
        Commands::Register {
            username,
            email,
            password,
        } => authenticate(c, AuthMode::Register, username, email, password).await,

        Commands::Logout => {
            c.logout();
            report(c)
        }

        Commands::Whoami => {
            match c.session.user() {
                Some(user) => println!("{} <{}>", user.username, user.email),
                None => println!("Non connecté"),
            }
            Ok(())
        }

        Commands::Sizes { category, gender } => {
            println!("{}", catalog::sizes_for(&category, &gender).join(" "));
            Ok(())
        }

        command => {
            require_login(c)?;
            run_authenticated(command, c).await
        }
    }
}

async fn authenticate(
    c: &mut Controller,
    mode: AuthMode,
    username: String,
    email: String,
    password: Option<String>,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => read_password()?,
    };
    c.login_form.mode = mode;
    c.login_form.username = username;
    c.login_form.email = email;
    c.login_form.password = password;

    // Login only needs the session, not the collections
    let pending = c.login();
    c.drive_once(pending).await;
    report(c)
}

fn require_login(c: &Controller) -> Result<()> {
    if !c.is_authenticated() {
        bail!("Non connecté : lancez `fichegen login <utilisateur>` d'abord");
    }
    Ok(())
}

async fn run_authenticated(command: Commands, c: &mut Controller) -> Result<()> {
    match command {
        Commands::Products { limit, search } => {
            if limit.is_some() {
                c.set_list_limit(limit);
            }
            let pending = vec![c.load(Collection::Products)];
            c.drive(pending).await;
            report_errors(c)?;
            for product in c.visible_products(search.as_deref().unwrap_or("")) {
                println!("{}", product_line(product));
            }
            Ok(())
        }

        Commands::Sheets { limit } => {
            if limit.is_some() {
                c.set_list_limit(limit);
            }
            let pending = vec![c.load(Collection::Sheets)];
            c.drive(pending).await;
            report_errors(c)?;
            for sheet in c.sheets.data() {
                println!(
                    "{}  {:<14} {:<10} {:>9}  {}",
                    sheet.id,
                    sheet.reference,
                    sheet.status.label(),
                    sheet.price_ttc.map(export::format_price).unwrap_or_default(),
                    sheet.title
                );
            }
            Ok(())
        }

        Commands::Stats => {
            let pending = vec![c.load(Collection::Stats)];
            c.drive(pending).await;
            report_errors(c)?;
            let stats = c.stats.data();
            println!("Produits  : {}", stats.total_products);
            println!("Fiches    : {}", stats.total_sheets);
            println!("Recherches: {}", stats.total_searches);
            for (category, count) in &stats.categories {
                println!("  {:<24} {}", category, count);
            }
            Ok(())
        }

        Commands::Generate { ean, no_sheet } => {
            let pending = c.generate_from_ean(&ean, !no_sheet);
            c.drive(pending).await;
            report(c)?;
            if let Some(summary) = &c.last_search {
                println!(
                    "{} résultats, marques : {}, catégorie : {}",
                    summary.results_count,
                    summary.brands_found.join(", "),
                    summary.category_detected
                );
            }
            if let Some(product) = c.products.data().first() {
                println!("{}", product_line(product));
            }
            Ok(())
        }

        Commands::Sheet { product_id } => {
            let pending = c.generate_sheet_for_product(&product_id);
            c.drive(pending).await;
            report(c)
        }

        Commands::Delete { id, yes } => {
            let pending = vec![c.load(Collection::Products)];
            c.drive(pending).await;
            c.request_delete(&id);
            let prompt = c
                .confirmation
                .as_ref()
                .map(|p| p.prompt().replace("\n\n", " "))
                .unwrap_or_default();

            if !yes && !confirm(&prompt) {
                c.cancel_confirm();
                println!("Annulé.");
                return Ok(());
            }
            let pending = c.confirm();
            c.drive(pending).await;
            report(c)
        }

        Commands::Export { sheet_id, format } => {
            let pending = c.export_sheet(&sheet_id, &format);
            c.drive(pending).await;
            report(c)
        }

        Commands::Create(args) => create(args, c).await,

        Commands::Upload { path } => {
            let pending = c.upload_image(path);
            c.drive(pending).await;
            report(c)?;
            if let Some(url) = c.form.images.first() {
                println!("{}", url);
            }
            Ok(())
        }

        Commands::Config { .. }
        | Commands::Login { .. }
        | Commands::Register { .. }
        | Commands::Logout
        | Commands::Whoami
        | Commands::Sizes { .. } => Ok(()),
    }
}

async fn create(args: CreateArgs, c: &mut Controller) -> Result<()> {
    if let Some(image) = args.image {
        let pending = c.upload_image(image);
        c.drive(pending).await;
        report_errors(c)?;
    }

    let form = &mut c.form;
    form.name = args.name;
    form.brand = args.brand;
    form.set_category(&args.category);
    form.set_gender(&args.gender);
    form.price = args.price;
    form.old_price = args.old_price.unwrap_or_default();
    form.sku = args.sku;
    form.description = args.description;
    form.material = args.material;
    form.season = args.season;
    form.features = args.features.join("\n");

    let offered = form.available_sizes();
    for size in &args.sizes {
        if !offered.contains(size) {
            bail!(
                "Taille {} indisponible pour {} / {} (tailles : {})",
                size,
                form.category,
                form.gender,
                offered.join(" ")
            );
        }
        form.toggle_size(size);
    }
    for color in &args.colors {
        form.toggle_color(color);
    }

    let pending = c.create_product();
    c.drive(pending).await;
    report(c)?;

    if let Some(text) = c.preview_clipboard_text() {
        println!();
        println!("{}", text);
    }
    if args.html {
        c.export_preview_html();
        report(c)?;
    }
    if args.json {
        c.export_preview_json();
        report(c)?;
    }
    Ok(())
}

fn product_line(product: &crate::api::types::Product) -> String {
    let price = product.price.map(export::format_price).unwrap_or_default();
    let discount = catalog::discount_percent(product.price.unwrap_or(0.0), product.old_price)
        .map(|d| format!(" (-{d}%)"))
        .unwrap_or_default();
    format!(
        "{}  {:<16} {:<40} {:>9}{}",
        product.id, product.brand, product.title, price, discount
    )
}

/// Print the current alert; error alerts become the command's error
fn report(c: &Controller) -> Result<()> {
    match &c.alert {
        Some(alert) if alert.kind == AlertKind::Error => bail!("{}", alert.message),
        Some(alert) => {
            println!("{} {}", alert.kind.icon(), alert.message);
            Ok(())
        }
        None => Ok(()),
    }
}

/// Like [`report`] but silent on success
fn report_errors(c: &Controller) -> Result<()> {
    match &c.alert {
        Some(alert) if matches!(alert.kind, AlertKind::Error | AlertKind::Warning) => {
            bail!("{}", alert.message)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["fichegen", "--demo", "generate", "3614270357637"]).unwrap();
        assert!(cli.demo);
        assert!(matches!(
            cli.command,
            Some(Commands::Generate { ref ean, no_sheet: false }) if ean == "3614270357637"
        ));

        let cli = Cli::try_parse_from(["fichegen", "delete", "p1", "--yes"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Delete { yes: true, .. })));

        let cli = Cli::try_parse_from(["fichegen"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn create_collects_repeated_flags() {
        let cli = Cli::try_parse_from([
            "fichegen", "create", "--name", "Polo", "--brand", "Lacoste", "--category", "polos",
            "--gender", "homme", "--price", "89", "--size", "M", "--size", "L", "--color", "Noir",
        ])
        .unwrap();
        let Some(Commands::Create(args)) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(args.sizes, vec!["M", "L"]);
        assert_eq!(args.colors, vec!["Noir"]);
        assert!(args.old_price.is_none());
    }

    #[test]
    fn export_format_defaults_to_prestashop() {
        let cli = Cli::try_parse_from(["fichegen", "export", "s1"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Export { ref format, .. }) if format == "prestashop"
        ));
    }
}
