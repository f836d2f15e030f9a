use std::str::FromStr;

use clap::Args;
use secman_lib::iam::Binding;

/// flags shared by commands that return a list of resources.
///
/// commands that only produce a single result leave these out so clap rejects
/// them as unexpected arguments.
#[derive(Debug, Default, Args)]
pub struct ListArgs {
    /// only return bindings matching the expression
    ///
    /// accepts "role:TEXT", "member:TEXT" or "TEXT". a bare value matches
    /// against either the role or the members
    #[arg(long)]
    pub filter: Option<Filter>,

    /// maximum number of bindings to return
    #[arg(long)]
    pub limit: Option<usize>,

    /// number of results to request per page
    #[arg(long)]
    pub page_size: Option<u32>,

    /// field to sort the bindings by. prefix with "~" to reverse
    #[arg(long)]
    pub sort_by: Option<SortBy>,

    /// print the resource uri instead of the result
    #[arg(long)]
    pub uri: bool,
}

impl ListArgs {
    /// applies the filter, sort and limit to the given bindings
    pub fn apply(&self, mut bindings: Vec<Binding>) -> Vec<Binding> {
        if let Some(page_size) = self.page_size {
            tracing::debug!(page_size, "page size ignored, the policy is returned in one response");
        }

        if let Some(filter) = &self.filter {
            bindings.retain(|binding| filter.matches(binding));
        }

        if let Some(sort_by) = &self.sort_by {
            bindings.sort_by(|a, b| a.role.cmp(&b.role));

            if sort_by.reverse {
                bindings.reverse();
            }
        }

        if let Some(limit) = self.limit {
            bindings.truncate(limit);
        }

        bindings
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Role(String),
    Member(String),
    Any(String),
}

impl Filter {
    pub fn matches(&self, binding: &Binding) -> bool {
        match self {
            Filter::Role(text) => binding.role.contains(text.as_str()),
            Filter::Member(text) => binding.members.iter()
                .any(|m| m.contains(text.as_str())),
            Filter::Any(text) => binding.role.contains(text.as_str()) ||
                binding.members.iter().any(|m| m.contains(text.as_str())),
        }
    }
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("filter cannot be empty".into());
        }

        if let Some(text) = s.strip_prefix("role:") {
            Ok(Filter::Role(text.to_owned()))
        } else if let Some(text) = s.strip_prefix("member:") {
            Ok(Filter::Member(text.to_owned()))
        } else {
            Ok(Filter::Any(s.to_owned()))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortBy {
    pub reverse: bool,
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (reverse, field) = match s.strip_prefix('~') {
            Some(field) => (true, field),
            None => (false, s),
        };

        match field {
            "role" => Ok(SortBy { reverse }),
            _ => Err(format!("cannot sort by \"{}\". valid fields: role", field))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn binding(role: &str, members: &[&str]) -> Binding {
        Binding {
            role: role.into(),
            members: members.iter().map(|m| m.to_string()).collect(),
            condition: None,
        }
    }

    fn bindings() -> Vec<Binding> {
        vec![
            binding("roles/secretmanager.viewer", &["user:bob@example.com"]),
            binding("roles/secretmanager.admin", &["group:ops@example.com"]),
            binding("roles/secretmanager.secretAccessor", &["serviceAccount:app@example.com", "user:bob@example.com"]),
        ]
    }

    fn roles(list: &[Binding]) -> Vec<&str> {
        list.iter().map(|b| b.role.as_str()).collect()
    }

    #[test]
    fn parse_filter() {
        assert_eq!("role:admin".parse::<Filter>(), Ok(Filter::Role("admin".into())));
        assert_eq!("member:bob".parse::<Filter>(), Ok(Filter::Member("bob".into())));
        assert_eq!("viewer".parse::<Filter>(), Ok(Filter::Any("viewer".into())));
        assert!("".parse::<Filter>().is_err());
    }

    #[test]
    fn parse_sort_by() {
        assert_eq!("role".parse::<SortBy>(), Ok(SortBy { reverse: false }));
        assert_eq!("~role".parse::<SortBy>(), Ok(SortBy { reverse: true }));
        assert!("members".parse::<SortBy>().is_err());
    }

    #[test]
    fn filter_by_member() {
        let args = ListArgs {
            filter: Some(Filter::Member("bob".into())),
            ..Default::default()
        };

        assert_eq!(roles(&args.apply(bindings())), vec![
            "roles/secretmanager.viewer",
            "roles/secretmanager.secretAccessor",
        ]);
    }

    #[test]
    fn sort_and_limit() {
        let args = ListArgs {
            sort_by: Some(SortBy { reverse: true }),
            limit: Some(2),
            ..Default::default()
        };

        assert_eq!(roles(&args.apply(bindings())), vec![
            "roles/secretmanager.viewer",
            "roles/secretmanager.secretAccessor",
        ]);
    }

    #[test]
    fn no_flags_keeps_order() {
        let args = ListArgs::default();

        assert_eq!(args.apply(bindings()), bindings());
    }
}
