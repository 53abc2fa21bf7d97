// helpers shared between the engine and its frontends

#[macro_export]
macro_rules! make_type_idx {
    ($vis:vis $type_idx_name:ident, $type_name:ty) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $vis struct $type_idx_name(u32);

        impl $type_idx_name {
            $vis fn from_push(vec: &mut Vec<$type_name>, val: $type_name) -> $type_idx_name {
                let idx = $type_idx_name(vec.len() as u32);
                vec.push(val);
                idx
            }

            $vis fn from_index(index: usize) -> $type_idx_name {
                $type_idx_name(index as u32)
            }

            $vis fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl std::ops::Index<$type_idx_name> for [$type_name] {
            type Output = $type_name;

            fn index(&self, index: $type_idx_name) -> &Self::Output {
                &self[index.0 as usize]
            }
        }

        impl std::ops::IndexMut<$type_idx_name> for [$type_name] {
            fn index_mut(&mut self, index: $type_idx_name) -> &mut Self::Output {
                &mut self[index.0 as usize]
            }
        }

        impl std::ops::Index<$type_idx_name> for Vec<$type_name> {
            type Output = $type_name;

            fn index(&self, index: $type_idx_name) -> &Self::Output {
                &self.as_slice()[index]
            }
        }

        impl std::ops::IndexMut<$type_idx_name> for Vec<$type_name> {
            fn index_mut(&mut self, index: $type_idx_name) -> &mut Self::Output {
                &mut self.as_mut_slice()[index]
            }
        }
    };
}

/// Tokens of a whitespace-delimited field, e.g. `q0 q1 q2`. Order and duplicates are kept.
pub fn field_tokens(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Tokens of a list where commas and whitespace both separate items, e.g. `q1, q2 q3`.
/// Empty tokens and repeats are dropped, first occurrence wins.
pub fn list_tokens(text: &str) -> Vec<&str> {
    split_dedup(text, |c| c == ',' || c.is_whitespace())
}

/// Tokens of a set literal such as `{q0, q2}`. Braces are treated like any other separator.
pub fn set_tokens(text: &str) -> Vec<&str> {
    split_dedup(text, |c| c == ',' || c == '{' || c == '}' || c.is_whitespace())
}

fn split_dedup(text: &str, is_separator: impl Fn(char) -> bool) -> Vec<&str> {
    let mut tokens: Vec<&str> = Vec::new();
    for token in text.split(is_separator) {
        if !token.is_empty() && !tokens.contains(&token) {
            tokens.push(token);
        }
    }

    tokens
}
