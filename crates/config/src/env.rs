//! `${VAR}` substitution in configuration values

use dqa_errors::ConfigError;

/// Replace every `${NAME}` in `input` using `lookup`.
///
/// An unterminated `${` is left as-is.
pub(crate) fn substitute<F>(input: &str, lookup: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        let name = &rest[start + 2..start + 2 + len];
        let value = lookup(name).ok_or_else(|| ConfigError::EnvVarNotFound {
            var: name.to_string(),
        })?;
        output.push_str(&rest[..start]);
        output.push_str(&value);
        rest = &rest[start + 3 + len..];
    }

    output.push_str(rest);
    Ok(output)
}

/// Walk a parsed TOML document and substitute inside every string.
pub(crate) fn substitute_value<F>(value: &mut toml::Value, lookup: &F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match value {
        toml::Value::String(s) => {
            if s.contains("${") {
                *s = substitute(s, lookup)?;
            }
        }
        toml::Value::Array(items) => {
            for item in items {
                substitute_value(item, lookup)?;
            }
        }
        toml::Value::Table(table) => {
            for (_, item) in table.iter_mut() {
                substitute_value(item, lookup)?;
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "HOOK" => Some("https://hooks.example.com/T000".to_string()),
            "EMPTY" => Some(String::new()),
            _ => None,
        }
    }

    #[test]
    fn replaces_known_variables() {
        assert_eq!(
            substitute("url=${HOOK}/x", &lookup).unwrap(),
            "url=https://hooks.example.com/T000/x"
        );
        assert_eq!(substitute("${EMPTY}", &lookup).unwrap(), "");
        assert_eq!(substitute("no vars", &lookup).unwrap(), "no vars");
    }

    #[test]
    fn unknown_variable_is_an_error() {
        assert!(matches!(
            substitute("${MISSING}", &lookup),
            Err(ConfigError::EnvVarNotFound { var }) if var == "MISSING"
        ));
    }

    #[test]
    fn unterminated_reference_is_kept() {
        assert_eq!(substitute("a ${HOOK", &lookup).unwrap(), "a ${HOOK");
    }
}
