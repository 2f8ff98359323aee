//! Normalizes the single-string-vs-list-of-columns surface at the facade
//! boundary. Engines below this never branch on scalar vs. list again,
//! they only ever see a plain `Vec<String>`.

/// Anything that can be turned into a list of column names.
pub trait IntoColumnNames {
    fn into_column_names(self) -> Vec<String>;
}

impl IntoColumnNames for &str {
    fn into_column_names(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoColumnNames for String {
    fn into_column_names(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoColumnNames for Vec<String> {
    fn into_column_names(self) -> Vec<String> {
        self
    }
}

impl IntoColumnNames for &[String] {
    fn into_column_names(self) -> Vec<String> {
        self.to_vec()
    }
}

impl IntoColumnNames for Vec<&str> {
    fn into_column_names(self) -> Vec<String> {
        self.into_iter().map(String::from).collect()
    }
}

impl<const N: usize> IntoColumnNames for [&str; N] {
    fn into_column_names(self) -> Vec<String> {
        self.into_iter().map(String::from).collect()
    }
}
