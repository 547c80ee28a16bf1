use std::fmt;

use crate::grammar::{HEADER_SUFFIX, RESOURCES_HEADER, RESOURCE_PREFIX, TAGGED_RULES};
use crate::message::Message;

/// Renders the canonical text: absent optionals leave no line behind and
/// there is no trailing line feed.
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scheme) = &self.scheme {
            write!(f, "{scheme}://")?;
        }
        writeln!(f, "{}{HEADER_SUFFIX}", self.domain)?;
        writeln!(f, "{}", self.address)?;
        writeln!(f)?;
        if let Some(statement) = &self.statement {
            writeln!(f, "{statement}")?;
        }
        writeln!(f)?;

        let mut first = true;
        for (field, _) in TAGGED_RULES {
            let (Some(tag), Some(value)) = (field.tag(), self.tagged_value(field)) else {
                continue;
            };
            if !first {
                writeln!(f)?;
            }
            write!(f, "{tag}{value}")?;
            first = false;
        }

        if !self.resources.is_empty() {
            write!(f, "\n{RESOURCES_HEADER}")?;
            for resource in &self.resources {
                write!(f, "\n{RESOURCE_PREFIX}{resource}")?;
            }
        }
        Ok(())
    }
}
