//! The ordered catalogue of known CSS properties.
//!
//! A property's position in the catalogue is its sort priority. Blank lines in
//! the catalogue text split it into groups; in grouped mode the sorter keeps
//! groups apart with a blank line.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Catalogue text shipped with the crate. Changing it changes sort order.
pub const CSS_PROPS_TEXT: &str = include_str!("../../assets/css_properties.txt");

/// Priority given to declarations whose property is not in the catalogue.
pub const UNMATCHED_PRIORITY: usize = 9999;

static UNGROUPED: Lazy<PropertyTable> = Lazy::new(|| PropertyTable::parse(CSS_PROPS_TEXT, false));
static GROUPED: Lazy<PropertyTable> = Lazy::new(|| PropertyTable::parse(CSS_PROPS_TEXT, true));

/// Where a declaration lands after sorting.
///
/// Field order matters: the derived `Ord` compares `group` first, then
/// `priority`, which is exactly the order declarations are emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortKey {
    pub group: usize,
    pub priority: usize,
}

impl SortKey {
    pub const UNMATCHED: SortKey = SortKey {
        group: 0,
        priority: UNMATCHED_PRIORITY,
    };

    pub fn is_unmatched(&self) -> bool {
        self.priority == UNMATCHED_PRIORITY
    }
}

/// An immutable, ordered list of property groups.
#[derive(Debug, Clone, Default)]
pub struct PropertyTable {
    groups: Vec<Vec<String>>,
    index: HashMap<String, SortKey>,
}

impl PropertyTable {
    /// Build a table from catalogue text.
    ///
    /// Names are lower-cased and split on whitespace, lines starting with `#`
    /// are ignored. With `grouped` every blank line closes the current group,
    /// otherwise everything goes into group 0.
    pub fn parse(catalogue: &str, grouped: bool) -> Self {
        let mut groups: Vec<Vec<String>> = Vec::new();
        let mut current: Vec<String> = Vec::new();

        for line in catalogue.lines() {
            let line = line.trim();
            if line.starts_with('#') {
                continue;
            }
            if line.is_empty() {
                if grouped && !current.is_empty() {
                    groups.push(std::mem::take(&mut current));
                }
                continue;
            }
            current.extend(line.split_whitespace().map(str::to_lowercase));
        }
        if !current.is_empty() {
            groups.push(current);
        }

        Self::from_groups(groups)
    }

    /// Build a table from explicit groups. Empty groups are skipped; if a name
    /// repeats only its first occurrence can ever match.
    pub fn from_groups<G, N>(groups: G) -> Self
    where
        G: IntoIterator<Item = Vec<N>>,
        N: Into<String>,
    {
        let groups: Vec<Vec<String>> = groups
            .into_iter()
            .map(|names| names.into_iter().map(|name| name.into().to_lowercase()).collect::<Vec<_>>())
            .filter(|names| !names.is_empty())
            .collect();

        let mut index = HashMap::new();
        let mut priority = 0;
        for (group, names) in groups.iter().enumerate() {
            for name in names {
                index
                    .entry(name.clone())
                    .or_insert(SortKey { group, priority });
                priority += 1;
            }
        }

        PropertyTable { groups, index }
    }

    /// The table built from [`CSS_PROPS_TEXT`], shared for the whole process.
    pub fn builtin(grouped: bool) -> &'static PropertyTable {
        if grouped {
            &GROUPED
        } else {
            &UNGROUPED
        }
    }

    /// Sort key of a property name, case-insensitive.
    pub fn lookup(&self, name: &str) -> Option<SortKey> {
        self.index.get(name.trim().to_lowercase().as_str()).copied()
    }

    pub fn groups(&self) -> &[Vec<String>] {
        &self.groups
    }

    /// All property names in priority order.
    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().flatten().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SMALL: &str = "
# a comment line
Color background

margin
padding
";

    #[test]
    fn ungrouped_puts_everything_in_group_zero() {
        let table = PropertyTable::parse(SMALL, false);
        assert_eq!(table.groups().len(), 1);
        assert_eq!(
            table.properties().collect::<Vec<_>>(),
            vec!["color", "background", "margin", "padding"]
        );
        assert_eq!(
            table.lookup("margin"),
            Some(SortKey {
                group: 0,
                priority: 2
            })
        );
    }

    #[test]
    fn grouped_splits_on_blank_lines() {
        let table = PropertyTable::parse(SMALL, true);
        assert_eq!(table.groups().len(), 2);
        assert_eq!(
            table.lookup("background"),
            Some(SortKey {
                group: 0,
                priority: 1
            })
        );
        assert_eq!(
            table.lookup("PADDING"),
            Some(SortKey {
                group: 1,
                priority: 3
            })
        );
    }

    #[test]
    fn consecutive_blank_lines_do_not_create_empty_groups() {
        let table = PropertyTable::parse("a\n\n\n\nb\n", true);
        assert_eq!(table.groups().len(), 2);
        assert_eq!(table.lookup("b").map(|key| key.group), Some(1));
    }

    #[test]
    fn comments_are_not_properties() {
        let table = PropertyTable::parse(SMALL, false);
        assert!(table.lookup("#").is_none());
        assert!(table.lookup("comment").is_none());
    }

    #[test]
    fn empty_catalogue_is_empty() {
        let table = PropertyTable::parse("", true);
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn first_occurrence_wins() {
        let table = PropertyTable::from_groups(vec![vec!["color"], vec!["margin", "color"]]);
        assert_eq!(
            table.lookup("color"),
            Some(SortKey {
                group: 0,
                priority: 0
            })
        );
    }

    #[test]
    fn builtin_catalogue_shape() {
        let flat = PropertyTable::builtin(false);
        let grouped = PropertyTable::builtin(true);
        assert_eq!(flat.len(), 239);
        assert_eq!(grouped.len(), 239);
        assert_eq!(flat.groups().len(), 1);
        assert_eq!(grouped.groups().len(), 22);

        assert_eq!(grouped.groups()[0][0], "alignment-adjust");
        assert_eq!(grouped.groups()[21], vec!["z-index".to_string()]);

        let background = flat.lookup("background").unwrap();
        let color = flat.lookup("color").unwrap();
        assert!(background < color);
        assert_eq!(grouped.lookup("margin").unwrap().group, 10);
    }

    #[test]
    fn sort_key_orders_by_group_then_priority() {
        let early_late_group = SortKey {
            group: 1,
            priority: 0,
        };
        let late_early_group = SortKey {
            group: 0,
            priority: 50,
        };
        assert!(late_early_group < early_late_group);
        assert!(SortKey::UNMATCHED.is_unmatched());
    }
}
