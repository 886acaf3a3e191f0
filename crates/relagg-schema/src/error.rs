use std::{collections::BTreeMap, fmt};

///
/// ErrorTree
///
/// Route-keyed accumulation of validation messages.
/// Messages at the root belong to the node being validated; child trees are
/// keyed by the route segment (resource, field, relationship) they came from.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ErrorTree {
    messages: Vec<String>,
    children: BTreeMap<String, Self>,
}

impl ErrorTree {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
            children: BTreeMap::new(),
        }
    }

    /// Record a message against this node.
    pub fn add(&mut self, message: impl fmt::Display) {
        self.messages.push(message.to_string());
    }

    /// Record a message against a child route.
    pub fn add_at(&mut self, route: impl Into<String>, message: impl fmt::Display) {
        self.children
            .entry(route.into())
            .or_default()
            .add(message);
    }

    /// Attach a child tree under `route`, skipping empty trees.
    pub fn merge(&mut self, route: impl Into<String>, child: Self) {
        if child.is_empty() {
            return;
        }

        let entry = self.children.entry(route.into()).or_default();
        entry.messages.extend(child.messages);
        for (key, grandchild) in child.children {
            entry.merge(key, grandchild);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.children.values().all(Self::is_empty)
    }

    /// Total number of messages in this tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len() + self.children.values().map(Self::len).sum::<usize>()
    }

    /// Flatten into `(route, message)` pairs with dotted routes.
    #[must_use]
    pub fn flatten(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        self.flatten_into("", &mut out);

        out
    }

    fn flatten_into(&self, prefix: &str, out: &mut Vec<(String, String)>) {
        for message in &self.messages {
            out.push((prefix.to_string(), message.clone()));
        }

        for (key, child) in &self.children {
            let route = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            child.flatten_into(&route, out);
        }
    }

    /// Convert into a result; `Ok(())` when no messages were recorded.
    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines = self.flatten();
        for (i, (route, message)) in lines.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            if route.is_empty() {
                write!(f, "{message}")?;
            } else {
                write!(f, "{route}: {message}")?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for ErrorTree {}

///
/// err
/// Format a message and add it to an `ErrorTree`.
///

#[macro_export]
macro_rules! err {
    ($errs:expr, $($arg:tt)*) => {{
        $errs.add(format!($($arg)*));
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_children_do_not_count_as_errors() {
        let mut tree = ErrorTree::new();
        tree.merge("order", ErrorTree::new());

        assert!(tree.is_empty());
        assert!(tree.result().is_ok());
    }

    #[test]
    fn flatten_uses_dotted_routes() {
        let mut child = ErrorTree::new();
        child.add_at("line_items", "destination 'ghost' is not registered");

        let mut tree = ErrorTree::new();
        err!(tree, "catalog has {} problems", 1);
        tree.merge("order", child);

        assert_eq!(tree.len(), 2);
        assert_eq!(
            tree.flatten(),
            vec![
                (String::new(), "catalog has 1 problems".to_string()),
                (
                    "order.line_items".to_string(),
                    "destination 'ghost' is not registered".to_string()
                ),
            ]
        );
        assert_eq!(
            tree.to_string(),
            "catalog has 1 problems\norder.line_items: destination 'ghost' is not registered"
        );
    }
}
