use colored::Colorize;
use lkit_codec::{decode_hex_with, encode_hex, DecodeMode};
use lkit_config::HarnessConfig;
use lkit_units::{from_base_units_str, to_base_units_with, ConversionMode};
use serde_json::json;

use crate::cli::*;

/// Result of one command, renderable as text or JSON.
pub struct Report {
    text: String,
    json: serde_json::Value,
}

pub fn run_command(cli: Cli, config: &HarnessConfig) -> anyhow::Result<()> {
    let report = match cli.command {
        Command::ToBase(args) => cmd_to_base(args)?,
        Command::FromBase(args) => cmd_from_base(args)?,
        Command::Encode(args) => cmd_encode(args),
        Command::Decode(args) => cmd_decode(args)?,
        Command::Config(args) => cmd_config(args, config)?,
    };
    match cli.format {
        OutputFormat::Text => println!("{}", report.text),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report.json)?),
    }
    Ok(())
}

fn cmd_to_base(args: ToBaseArgs) -> anyhow::Result<Report> {
    let scale = args.denomination.resolve();
    let mode = if args.strict { ConversionMode::Strict } else { ConversionMode::Truncate };
    let amount = to_base_units_with(&args.amount, scale, mode)?;
    tracing::debug!(input = %args.amount, scale, %amount, "converted to base units");
    Ok(Report {
        text: format!("{} {}", amount.to_string().bold(), "base units".dimmed()),
        json: json!({ "input": args.amount, "scale": scale, "amount": amount }),
    })
}

fn cmd_from_base(args: FromBaseArgs) -> anyhow::Result<Report> {
    let scale = args.denomination.resolve();
    let display = from_base_units_str(&args.amount, scale)?;
    let label = match args.denomination.unit {
        Some(unit) => unit.to_string(),
        None if args.denomination.scale.is_some() => format!("scale {scale}"),
        None => "ether".to_string(),
    };
    Ok(Report {
        text: format!("{} {}", display.as_str().bold(), label.cyan()),
        json: json!({ "input": args.amount, "scale": scale, "display": display }),
    })
}

fn cmd_encode(args: EncodeArgs) -> Report {
    let payload = encode_hex(&args.text);
    Report {
        text: payload.as_str().yellow().to_string(),
        json: json!({ "text": args.text, "payload": payload, "units": payload.unit_count() }),
    }
}

fn cmd_decode(args: DecodeArgs) -> anyhow::Result<Report> {
    let mode = if args.lenient { DecodeMode::Lenient } else { DecodeMode::Strict };
    let text = decode_hex_with(&args.payload, mode)?;
    Ok(Report {
        text: text.clone(),
        json: json!({ "payload": args.payload, "text": text }),
    })
}

fn cmd_config(args: ConfigArgs, config: &HarnessConfig) -> anyhow::Result<Report> {
    if let Some(name) = args.network {
        let network = config.network(&name)?;
        let gas_price = config.effective_gas_price(&name)?;
        let mut text = format!("Network {}\n", name.yellow().bold());
        text.push_str(&format!(
            "  Endpoint: {}\n",
            network.endpoint().unwrap_or_else(|| "(none)".into()).blue()
        ));
        text.push_str(&format!("  Network id: {}\n", network.network_id));
        if let Some(gas) = network.gas {
            text.push_str(&format!("  Gas limit: {gas}\n"));
        }
        text.push_str(&format!("  Gas price: {gas_price} wei"));
        return Ok(Report {
            text,
            json: json!({ "name": name, "network": network, "effective_gas_price": gas_price }),
        });
    }

    let flag = |on: bool| if on { "on".green() } else { "off".dimmed() };
    let mut text = format!("Gas price: {} wei\n", config.gas_price.to_string().bold());
    text.push_str(&format!("Debug: {}\n", flag(config.debug)));
    text.push_str(&format!("Coverage: {}\n", flag(config.coverage)));
    text.push_str("Networks:");
    for name in config.networks.keys() {
        let marker = if *name == config.default_network { "*" } else { " " };
        text.push_str(&format!("\n{marker} {}", name.yellow()));
    }
    Ok(Report {
        text,
        json: serde_json::to_value(config)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn report(args: &[&str]) -> anyhow::Result<Report> {
        let cli = Cli::try_parse_from(args).unwrap();
        let config = HarnessConfig::default();
        match cli.command {
            Command::ToBase(a) => cmd_to_base(a),
            Command::FromBase(a) => cmd_from_base(a),
            Command::Encode(a) => Ok(cmd_encode(a)),
            Command::Decode(a) => cmd_decode(a),
            Command::Config(a) => cmd_config(a, &config),
        }
    }

    #[test]
    fn to_base_json() {
        let r = report(&["lkit", "to-base", "1.5"]).unwrap();
        assert_eq!(r.json["amount"], "1500000000000000000");
        assert_eq!(r.json["scale"], 18);
    }

    #[test]
    fn to_base_strict_failure() {
        assert!(report(&["lkit", "to-base", "0.0000001", "--scale", "6", "--strict"]).is_err());
    }

    #[test]
    fn from_base_json() {
        let r = report(&["lkit", "from-base", "21000000000", "--unit", "gwei"]).unwrap();
        assert_eq!(r.json["display"], "21");
    }

    #[test]
    fn encode_and_decode() {
        let r = report(&["lkit", "encode", "AB"]).unwrap();
        assert_eq!(r.json["payload"], "00410042");
        assert_eq!(r.json["units"], 2);
        let r = report(&["lkit", "decode", "00410042"]).unwrap();
        assert_eq!(r.text, "AB");
        assert!(report(&["lkit", "decode", "004"]).is_err());
        let r = report(&["lkit", "decode", "004", "--lenient"]).unwrap();
        assert_eq!(r.text, "");
    }

    #[test]
    fn config_network_json() {
        let r = report(&["lkit", "config", "--network", "coverage"]).unwrap();
        assert_eq!(r.json["effective_gas_price"], "1");
        assert_eq!(r.json["network"]["port"], 8555);
        assert!(report(&["lkit", "config", "--network", "mainnet"]).is_err());
    }

    #[test]
    fn config_summary_json() {
        let r = report(&["lkit", "config"]).unwrap();
        assert_eq!(r.json["gas_price"], "21000000000");
        assert_eq!(r.json["default_network"], "development");
    }
}
