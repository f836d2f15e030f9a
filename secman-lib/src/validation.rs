pub const MAX_SECRET_ID_CHARS: usize = 255;

pub const MAX_LOCATION_CHARS: usize = 63;

pub const MAX_PROJECT_ID_CHARS: usize = 100;

fn is_lower_alnum_hyphen(ch: char) -> bool {
    ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-'
}

/// secret ids are limited to ascii letters, digits, underscores and hyphens
pub fn check_secret_id<G>(given: G) -> bool
where
    G: AsRef<str>
{
    let given_ref = given.as_ref();

    if given_ref.is_empty() || given_ref.len() > MAX_SECRET_ID_CHARS {
        return false;
    }

    given_ref.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
}

/// locations end up in the endpoint host name so only lowercase letters,
/// digits and hyphens are accepted
pub fn check_location<G>(given: G) -> bool
where
    G: AsRef<str>
{
    let given_ref = given.as_ref();

    if given_ref.is_empty() || given_ref.len() > MAX_LOCATION_CHARS {
        return false;
    }

    given_ref.chars().all(is_lower_alnum_hyphen)
}

/// project ids or numbers. domain scoped projects carry a `domain:` prefix
/// where the domain may also contain periods.
pub fn check_project_id<G>(given: G) -> bool
where
    G: AsRef<str>
{
    let given_ref = given.as_ref();

    if given_ref.is_empty() || given_ref.len() > MAX_PROJECT_ID_CHARS {
        return false;
    }

    let (domain, id) = match given_ref.split_once(':') {
        Some((domain, id)) => (Some(domain), id),
        None => (None, given_ref),
    };

    if let Some(domain) = domain {
        let valid_domain = !domain.is_empty() &&
            !domain.starts_with('.') &&
            !domain.ends_with('.') &&
            domain.chars().all(|ch| is_lower_alnum_hyphen(ch) || ch == '.');

        if !valid_domain {
            return false;
        }
    }

    !id.is_empty() && id.chars().all(is_lower_alnum_hyphen)
}
