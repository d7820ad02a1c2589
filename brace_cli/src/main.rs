//! # Brace CLI
//!
//! Runs the equilibrium derivation for one geometry and prints the
//! normalized minimum forces.
//!
//! ```text
//! brace --r1 1,0 --r2 0,-1            # concrete positions, symbolic load g
//! brace                               # fully symbolic
//! brace --mode stationary --contact 2 --json
//! brace --relations                   # relation reference
//! ```

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use brace_core::derivation::{Derivation, NormalizedForces};
use brace_core::equations::generate_relations_markdown;
use brace_core::geometry::{is_reserved, names, Contact, ForceComponent, Geometry, Position};
use brace_core::{derive, DerivationSettings, Expr, MinimizationMode, Pin};
use clap::{ArgAction, Parser, ValueEnum};
use num_rational::BigRational;
use serde::Serialize;
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

#[derive(Parser)]
#[command(name = "brace")]
#[command(about = "Exact minimum-force equilibrium for a body held at two contacts")]
struct Cmd {
    /// Position of contact 1 as X,Y (rationals like -1/2, or symbol names)
    #[arg(long, allow_hyphen_values = true)]
    r1: Option<String>,

    /// Position of contact 2 as X,Y
    #[arg(long, allow_hyphen_values = true)]
    r2: Option<String>,

    /// Load magnitude (rational or symbol name)
    #[arg(long, default_value = names::LOAD, allow_hyphen_values = true)]
    load: String,

    /// JSON settings file; flags below override it
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Run only this minimization mode
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Minimize only this contact (1 or 2)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=2))]
    contact: Option<u8>,

    /// Quantity pinned to the free parameter
    #[arg(long, value_enum)]
    pin: Option<PinArg>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    /// Print the relation reference and exit
    #[arg(long)]
    relations: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Stationary,
    ZeroTorque,
}

impl From<ModeArg> for MinimizationMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Stationary => MinimizationMode::Stationary,
            ModeArg::ZeroTorque => MinimizationMode::ZeroIndividualTorque,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PinArg {
    Tension,
    F1x,
    F1y,
    F2x,
    F2y,
}

impl From<PinArg> for Pin {
    fn from(arg: PinArg) -> Self {
        let component = match arg {
            PinArg::Tension => return Pin::Tension,
            PinArg::F1x => ForceComponent::F1X,
            PinArg::F1y => ForceComponent::F1Y,
            PinArg::F2x => ForceComponent::F2X,
            PinArg::F2y => ForceComponent::F2Y,
        };
        Pin::Component { component }
    }
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = match cmd.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if cmd.relations {
        print!("{}", generate_relations_markdown());
        return Ok(());
    }

    let settings = load_settings(&cmd)?;
    let geometry = build_geometry(&cmd)?;
    tracing::info!(r1 = ?cmd.r1, r2 = ?cmd.r2, load = %geometry.load, "geometry");

    match derive(&geometry, &settings) {
        Ok(derivation) => {
            if cmd.json {
                println!("{}", serde_json::to_string_pretty(&Report::new(&derivation))?);
            } else {
                print_text(&derivation);
            }
            Ok(())
        }
        Err(e) => {
            if cmd.json {
                println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "error": e }))?);
            } else {
                eprintln!("Error [{}]: {}", e.error_code(), e);
                if let Ok(json) = serde_json::to_string_pretty(&e) {
                    eprintln!();
                    eprintln!("Error JSON:");
                    eprintln!("{}", json);
                }
            }
            Err(e.into())
        }
    }
}

// ============================================================================
// Input
// ============================================================================

fn load_settings(cmd: &Cmd) -> Result<DerivationSettings> {
    let mut settings = match &cmd.settings {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading settings from {}", path.display()))?;
            DerivationSettings::from_json(&json)?
        }
        None => DerivationSettings::default(),
    };
    if let Some(mode) = cmd.mode {
        settings.modes = vec![mode.into()];
    }
    if let Some(contact) = cmd.contact {
        settings.contacts = vec![if contact == 1 { Contact::One } else { Contact::Two }];
    }
    if let Some(pin) = cmd.pin {
        settings.pin = pin.into();
    }
    settings.validate()?;
    Ok(settings)
}

/// A rational like `3`, `-1/2`, or a symbol name like `a`.
fn parse_scalar(text: &str) -> Result<Expr> {
    let text = text.trim();
    if let Ok(value) = BigRational::from_str(text) {
        return Ok(Expr::from_rational(value));
    }
    let is_symbol = text
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && text.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !is_symbol {
        bail!("'{}' is neither an exact rational nor a symbol name", text);
    }
    if is_reserved(text) {
        bail!("'{}' names the free parameter or an unknown force", text);
    }
    Ok(Expr::symbol(text))
}

fn parse_position(text: &str) -> Result<Position> {
    let Some((x, y)) = text.split_once(',') else {
        bail!("position '{}' must be written X,Y", text);
    };
    Ok(Position::new(parse_scalar(x)?, parse_scalar(y)?))
}

fn build_geometry(cmd: &Cmd) -> Result<Geometry> {
    let r1 = match &cmd.r1 {
        Some(text) => parse_position(text).context("--r1")?,
        None => Position::symbolic(Contact::One),
    };
    let r2 = match &cmd.r2 {
        Some(text) => parse_position(text).context("--r2")?,
        None => Position::symbolic(Contact::Two),
    };
    let load = parse_scalar(&cmd.load).context("--load")?;
    Ok(Geometry::new(r1, r2, load))
}

// ============================================================================
// Output
// ============================================================================

#[derive(Serialize)]
struct Report<'a> {
    geometry: &'a Geometry,
    equations: Vec<String>,
    relations: Vec<&'static str>,
    family: std::collections::BTreeMap<String, Expr>,
    results: &'a [NormalizedForces],
}

impl<'a> Report<'a> {
    fn new(derivation: &'a Derivation) -> Self {
        Report {
            geometry: &derivation.geometry,
            equations: derivation.equations.equations().iter().map(ToString::to_string).collect(),
            relations: derivation.relations.iter().map(|r| r.metadata().name).collect(),
            family: derivation.family.named(),
            results: &derivation.normalized,
        }
    }
}

fn print_text(derivation: &Derivation) {
    let g = &derivation.geometry;
    println!("═══════════════════════════════════════");
    println!("  TWO-CONTACT EQUILIBRIUM");
    println!("═══════════════════════════════════════");
    println!();
    println!("Geometry:");
    println!("  r1   = ({}, {})", g.r1.x, g.r1.y);
    println!("  r2   = ({}, {})", g.r2.x, g.r2.y);
    println!("  load = {}", g.load);
    println!();
    println!("Equilibrium:");
    for equation in derivation.equations.equations() {
        println!("  {}", equation);
    }
    println!();
    println!("Solution family (t = tension):");
    for (name, value) in derivation.family.named() {
        println!("  {} = {}", name, value);
    }
    if let Some(decomposition) = &derivation.decomposition {
        println!();
        println!("Null-space decomposition:");
        println!("  zero-tension = {}", tuple(&decomposition.particular));
        println!("  unit kernel  = {}", tuple(&decomposition.scaled_kernel));
        println!("  fac          = {}", decomposition.fac);
    }
    for normalized in &derivation.normalized {
        println!();
        println!("Minimum force at {} ({}):", normalized.contact, normalized.mode);
        println!("  scale = {}", normalized.scale);
        println!("  t     = {} × scale", normalized.parameter);
        for (name, coefficient) in &normalized.coefficients {
            println!("  {}  = {} × scale", name, coefficient);
        }
    }
    println!();
    println!("═══════════════════════════════════════");
}

fn tuple(values: &[Expr; 4]) -> String {
    let parts: Vec<String> = values.iter().map(ToString::to_string).collect();
    format!("({})", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scalar() {
        assert_eq!(parse_scalar("-1/2").unwrap(), Expr::ratio(-1, 2));
        assert_eq!(parse_scalar(" 3 ").unwrap(), Expr::int(3));
        assert_eq!(parse_scalar("w").unwrap(), Expr::symbol("w"));
        assert!(parse_scalar("1/0").is_err());
        assert!(parse_scalar("0.5").is_err());
    }

    #[test]
    fn test_parse_scalar_rejects_reserved_names() {
        assert!(parse_scalar("t").is_err());
        assert!(parse_scalar("F_2y").is_err());
        assert!(parse_scalar("tau").is_ok());

        let cmd = Cmd::parse_from(["brace", "--r1", "1,0", "--r2", "0,-1", "--load", "t"]);
        assert!(build_geometry(&cmd).is_err());
    }

    #[test]
    fn test_parse_position() {
        let p = parse_position("1,-1").unwrap();
        assert_eq!(p, Position::int(1, -1));
        assert!(parse_position("1").is_err());
    }

    #[test]
    fn test_flags_override_settings() {
        let cmd = Cmd::parse_from(["brace", "--mode", "zero-torque", "--contact", "2", "--pin", "f2y"]);
        let settings = load_settings(&cmd).unwrap();
        assert_eq!(settings.modes, vec![MinimizationMode::ZeroIndividualTorque]);
        assert_eq!(settings.contacts, vec![Contact::Two]);
        assert_eq!(settings.pin, Pin::CONTACT_TWO_VERTICAL);
    }

    #[test]
    fn test_report_lists_every_result() {
        let cmd = Cmd::parse_from(["brace", "--r1", "1,0", "--r2", "0,-1"]);
        let geometry = build_geometry(&cmd).unwrap();
        let derivation = derive(&geometry, &DerivationSettings::default()).unwrap();
        let json = serde_json::to_value(Report::new(&derivation)).unwrap();
        assert_eq!(json["results"].as_array().unwrap().len(), 4);
        assert_eq!(json["results"][0]["scale"], "g/2");
    }
}
