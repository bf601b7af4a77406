//! Validate command implementation

use super::load_schema;
use crate::cli::error::CliError;
use crate::validation::validate_columns;
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Debug, Clone)]
pub struct ValidateArgs {
    pub schema: PathBuf,
    /// Treat warnings as errors
    pub strict: bool,
}

/// Handle the validate command
pub fn handle_validate(args: &ValidateArgs) -> Result<(), CliError> {
    let columns = load_schema(&args.schema)?;
    let result = validate_columns(&columns);

    for issue in &result.errors {
        eprintln!("error: {}: {}", issue.location, issue.message);
    }
    for issue in &result.warnings {
        eprintln!("warning: {}: {}", issue.location, issue.message);
    }

    let failures = if args.strict {
        result.errors.len() + result.warnings.len()
    } else {
        result.errors.len()
    };
    if failures > 0 {
        return Err(CliError::ValidationError(failures));
    }

    println!("Validation successful");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_validate_strict() {
        let dir = tempdir().unwrap();
        let schema = dir.path().join("schema.yaml");
        std::fs::write(
            &schema,
            r#"
- title: 车牌号
  dataIndex: plate
  valueType: text
- title: 车牌号码
  dataIndex: plate
  valueType: text
"#,
        )
        .unwrap();

        assert!(
            handle_validate(&ValidateArgs {
                schema: schema.clone(),
                strict: false,
            })
            .is_ok()
        );
        assert!(matches!(
            handle_validate(&ValidateArgs {
                schema,
                strict: true
            }),
            Err(CliError::ValidationError(1))
        ));
    }
}
