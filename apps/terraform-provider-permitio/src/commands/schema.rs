//! Print every schema the provider exposes.

use crate::commands::print_json;
use crate::error::CliResult;
use clap::Args;
use permitio_provider::PermitProvider;

/// Print the provider, resource and data source schemas as JSON
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Print the schema of a single resource or data source type
    #[arg(short = 't', long = "type")]
    pub type_name: Option<String>,
}

pub fn execute(args: SchemaArgs) -> CliResult<()> {
    let schemas = PermitProvider::describe()?;
    let Some(type_name) = args.type_name else {
        return print_json(&schemas);
    };

    if let Some(schema) = schemas.resource_schemas.get(&type_name) {
        return print_json(schema);
    }
    match schemas.data_source_schemas.get(&type_name) {
        Some(schema) => print_json(schema),
        None => Err(crate::error::CliError::UnknownType {
            kind: "resource or data source",
            name: type_name,
        }),
    }
}
