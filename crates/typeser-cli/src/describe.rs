//! `typeser describe`: print the serializer tree built for a type.

use anyhow::Result;
use clap::Args;
use typeser_core::Serializer;

use crate::{extensions, SchemaArgs};

/// Arguments for `typeser describe`.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    #[command(flatten)]
    pub schema: SchemaArgs,
}

/// Execute `typeser describe`.
pub fn run_describe(args: &DescribeArgs) -> Result<u8> {
    let serializer = args.schema.serializer(&extensions::registry())?;
    print!("{}", describe(&serializer));
    Ok(0)
}

/// One line per node, depth first, indented two spaces per level.
pub fn describe(serializer: &Serializer) -> String {
    serializer
        .walk()
        .into_iter()
        .map(|(depth, breadcrumb)| format!("{:indent$}{breadcrumb}\n", "", indent = depth * 2))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use typeser_core::{Registry, TypeDesc};

    #[test]
    fn test_tree_layout() {
        let desc = TypeDesc::mapping(TypeDesc::str(), TypeDesc::optional(TypeDesc::int()));
        let s = Registry::new().create(&desc).unwrap();
        assert_eq!(
            describe(&s),
            "mapping\n  mapping[key]->str\n  mapping[value]->union\n    mapping[value]->union[0]->int\n    mapping[value]->union[1]->None\n"
        );
    }
}
