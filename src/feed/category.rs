use serde::Deserialize;

/// Channel category data: a single value or an arbitrarily nested group.
///
/// Rendering flattens the structure depth-first, one `<category>` per leaf.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Category {
    Leaf(String),
    Nested(Vec<Category>),
}

impl Category {
    /// Leaf values in depth-first order.
    pub fn leaves(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Category::Leaf(value) => out.push(value),
            Category::Nested(children) => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
        }
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Category::Leaf(value.to_owned())
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::Leaf(value)
    }
}

impl<T: Into<Category>> From<Vec<T>> for Category {
    fn from(values: Vec<T>) -> Self {
        Category::Nested(values.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf() {
        assert_eq!(Category::from("Tech").leaves(), vec!["Tech"]);
    }

    #[test]
    fn test_nested_flattens_depth_first() {
        let category = Category::Nested(vec![
            Category::from("A"),
            Category::Nested(vec![
                Category::from("B"),
                Category::Nested(vec![Category::from("C")]),
            ]),
            Category::from("D"),
        ]);
        assert_eq!(category.leaves(), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_empty_nested_has_no_leaves() {
        assert!(Category::Nested(Vec::new()).leaves().is_empty());
    }

    #[test]
    fn test_from_vec() {
        let category = Category::from(vec!["x", "y"]);
        assert_eq!(category.leaves(), vec!["x", "y"]);
    }

    #[test]
    fn test_deserialize_mixed_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            category: Vec<Category>,
        }
        let parsed: Wrapper = toml::from_str(r#"category = ["a", ["b", ["c"]]]"#).unwrap();
        let flat: Vec<&str> = parsed.category.iter().flat_map(Category::leaves).collect();
        assert_eq!(flat, vec!["a", "b", "c"]);
    }
}
