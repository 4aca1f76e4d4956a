/// Count the labels of a presentation format domain name.
///
/// A dot escaped with a backslash is part of a label instead of the end of one,
/// and a backslash only escapes the single character after it. Decimal escapes
/// (`\DDD`) are not decoded: `\046` is counted as the characters `046` rather
/// than as an escaped dot. The root label is not counted, so both `""` and `"."`
/// have zero labels and `"miek.nl"` and `"miek.nl."` both have two.
pub fn label_count(name: &str) -> usize {
    let mut labels = 0;
    let mut in_label = false;
    let mut escaped = false;

    for c in name.chars() {
        if escaped {
            escaped = false;
            in_label = true;
            continue;
        }

        match c {
            '\\' => {
                escaped = true;
                in_label = true;
            }
            '.' => {
                if in_label {
                    labels += 1;
                }
                in_label = false;
            }
            _ => in_label = true,
        }
    }

    if in_label {
        labels += 1;
    }

    labels
}

/// Return true if the name is fully qualified: it ends with a dot that isn't escaped.
pub fn is_fqdn(name: &str) -> bool {
    let Some(stripped) = name.strip_suffix('.') else {
        return false;
    };

    // The final dot is escaped if it's preceded by an odd number of backslashes.
    let backslashes = stripped.chars().rev().take_while(|c| *c == '\\').count();
    backslashes % 2 == 0
}

#[cfg(test)]
mod test {
    use super::{is_fqdn, label_count};

    #[test]
    fn test_label_count_root() {
        assert_eq!(0, label_count(""));
        assert_eq!(0, label_count("."));
    }

    #[test]
    fn test_label_count_relative() {
        assert_eq!(1, label_count("nl"));
        assert_eq!(3, label_count("a.miek.nl"));
    }

    #[test]
    fn test_label_count_fqdn() {
        assert_eq!(3, label_count("a.miek.nl."));
        assert_eq!(4, label_count("dev.www.example.com."));
    }

    #[test]
    fn test_label_count_escaped_dot() {
        assert_eq!(2, label_count("a\\.b.nl"));
        assert_eq!(2, label_count("a\\.b.nl."));
        assert_eq!(1, label_count("a\\."));
    }

    #[test]
    fn test_label_count_escaped_backslash() {
        // An escaped backslash doesn't escape the dot after it
        assert_eq!(3, label_count("a\\\\.b.nl"));
    }

    #[test]
    fn test_label_count_escape_only_next_char() {
        assert_eq!(3, label_count("a\\bc.d.nl"));
    }

    #[test]
    fn test_label_count_decimal_escape_not_decoded() {
        assert_eq!(3, label_count("a\\046b.miek.nl"));
    }

    #[test]
    fn test_is_fqdn() {
        assert!(is_fqdn("."));
        assert!(is_fqdn("example.com."));
        assert!(is_fqdn("a\\\\."));
        assert!(!is_fqdn(""));
        assert!(!is_fqdn("example.com"));
        assert!(!is_fqdn("example\\."));
    }
}
