// Command line interface

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::collections::BTreeMap;

use crate::{
    config::DEFAULT_CONFIG_FILE,
    domain::template::VariableValues,
    validation,
};

const DEFAULT_BIND: &str = "127.0.0.1:8000";

pub fn build_cli() -> Command {
    Command::new("uritmpl")
        .about("RFC 6570 URI Templates: expand, extract and route")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("serve")
                .about("Serve the JSON API over a route table")
                .arg(
                    Arg::new("routes")
                        .short('r')
                        .long("routes")
                        .value_name("FILE")
                        .help("Path to a YAML file containing routes")
                        .default_value(DEFAULT_CONFIG_FILE),
                )
                .arg(
                    Arg::new("bind")
                        .short('b')
                        .long("bind")
                        .value_name("ADDR")
                        .help("Address to listen on")
                        .default_value(DEFAULT_BIND),
                ),
        )
        .subcommand(
            Command::new("expand")
                .about("Expand a template and print the URI")
                .arg(Arg::new("template").required(true).value_name("TEMPLATE"))
                .arg(
                    Arg::new("values")
                        .long("values")
                        .value_name("JSON")
                        .help("Variable values as a JSON object")
                        .default_value("{}"),
                ),
        )
        .subcommand(
            Command::new("extract")
                .about("Match a URI against a template and print the values as JSON")
                .arg(Arg::new("template").required(true).value_name("TEMPLATE"))
                .arg(Arg::new("uri").required(true).value_name("URI"))
                .arg(
                    Arg::new("shape")
                        .short('s')
                        .long("shape")
                        .value_name("NAME=SHAPE")
                        .help("Expected shape of a variable: scalar, list or map")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("require")
                        .long("require")
                        .value_name("NAME")
                        .help("Fail unless this variable is present")
                        .action(ArgAction::Append),
                ),
        )
}

#[derive(Debug, PartialEq)]
pub enum CliCommand {
    Serve {
        routes: String,
        bind: String,
    },
    Expand {
        template: String,
        values: VariableValues,
    },
    Extract {
        template: String,
        uri: String,
        shapes: BTreeMap<String, String>,
        required: Vec<String>,
    },
}

impl CliCommand {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let string = |m: &ArgMatches, id: &str| m.get_one::<String>(id).cloned().unwrap_or_default();
        let many = |m: &ArgMatches, id: &str| -> Vec<String> {
            m.get_many::<String>(id)
                .map(|values| values.cloned().collect())
                .unwrap_or_default()
        };

        match matches.subcommand() {
            Some(("serve", m)) => Ok(CliCommand::Serve {
                routes: string(m, "routes"),
                bind: string(m, "bind"),
            }),
            Some(("expand", m)) => {
                let values: VariableValues = serde_json::from_str(&string(m, "values"))
                    .context("--values must be a JSON object of strings, numbers, lists and maps")?;
                Ok(CliCommand::Expand {
                    template: string(m, "template"),
                    values,
                })
            }
            Some(("extract", m)) => {
                let shapes = many(m, "shape")
                    .iter()
                    .map(|arg| validation::parse_shape_arg(arg))
                    .collect::<Result<BTreeMap<_, _>, _>>()?;
                Ok(CliCommand::Extract {
                    template: string(m, "template"),
                    uri: string(m, "uri"),
                    shapes,
                    required: many(m, "require"),
                })
            }
            Some((other, _)) => anyhow::bail!("Unknown command: {}", other),
            None => anyhow::bail!("No command given"),
        }
    }
}

pub fn run_expand(template: &str, values: &VariableValues) -> Result<String> {
    let template = validation::validate_template(template)?;
    Ok(template.expand(values)?)
}

/// Extracted values as pretty JSON
pub fn run_extract(
    template: &str,
    uri: &str,
    shapes: &BTreeMap<String, String>,
    required: &[String],
) -> Result<String> {
    let template = validation::validate_template(template)?;
    let options = validation::validate_extract_options(&template, shapes, required)?;
    let values = template.extract_with(uri, &options)?;

    // Sorted keys keep the output stable
    let sorted: BTreeMap<_, _> = values.iter().collect();
    Ok(serde_json::to_string_pretty(&sorted)?)
}
