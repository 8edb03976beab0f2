//! Ordered, name-addressable parameter collection.

use rust_decimal::Decimal;

use super::{AnyParameter, ParamKind, ParamType, Parameter, ParameterHandle};
use crate::matching::{self, same_word};
use crate::EngineError;

/// Parameters kept in ascending `order`, looked up by case-insensitive name.
///
/// Rules receive a shared reference to this set when they are evaluated,
/// so they can read any parameter but never change one.
#[derive(Debug, Default)]
pub struct ParameterSet {
    params: Vec<AnyParameter>,
}

impl ParameterSet {
    /// Build a set, rejecting names that collide case-insensitively.
    pub fn new(params: Vec<AnyParameter>) -> Result<Self, EngineError> {
        for (i, param) in params.iter().enumerate() {
            if params[..i].iter().any(|p| same_word(p.name(), param.name())) {
                return Err(EngineError::DuplicateParameter {
                    name: param.name().to_string(),
                });
            }
        }

        let mut params = params;
        // Stable: equal orders keep their declaration order
        params.sort_by_key(|p| p.order());
        Ok(Self { params })
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Parameters in ascending `order`.
    pub fn iter(&self) -> impl Iterator<Item = &AnyParameter> {
        self.params.iter()
    }

    pub fn find(&self, name: &str) -> Result<&AnyParameter, EngineError> {
        self.params
            .iter()
            .find(|p| same_word(p.name(), name))
            .ok_or_else(|| not_found(name))
    }

    pub(crate) fn find_mut(&mut self, name: &str) -> Result<&mut AnyParameter, EngineError> {
        self.params
            .iter_mut()
            .find(|p| same_word(p.name(), name))
            .ok_or_else(|| not_found(name))
    }

    /// First parameter of the given type, by order.
    pub fn first_of_type(&self, param_type: ParamType) -> Option<&AnyParameter> {
        self.params.iter().find(|p| p.param_type() == param_type)
    }

    /// Typed lookup; fails if the name is unknown or declared with another type.
    pub fn typed<T: ParamKind>(&self, name: &str) -> Result<&Parameter<T>, EngineError> {
        let param = self.find(name)?;
        T::downcast(param).ok_or_else(|| EngineError::TypeMismatch {
            name: param.name().to_string(),
            expected: T::TYPE,
            actual: param.param_type(),
        })
    }

    pub fn text(&self, name: &str) -> Result<&str, EngineError> {
        self.typed::<String>(name).map(|p| p.value().as_str())
    }

    pub fn integer(&self, name: &str) -> Result<i32, EngineError> {
        self.typed::<i32>(name).map(|p| *p.value())
    }

    pub fn decimal(&self, name: &str) -> Result<Decimal, EngineError> {
        self.typed::<Decimal>(name).map(|p| *p.value())
    }

    /// Whether the space-delimited text parameter `name` lists `token`.
    pub fn contains_token(&self, name: &str, token: &str) -> Result<bool, EngineError> {
        Ok(matching::contains_token(self.text(name)?, token))
    }

    /// How many distinct entries of `reference` the text parameter `name` lists.
    pub fn count_matches(&self, name: &str, reference: &[&str]) -> Result<usize, EngineError> {
        Ok(matching::count_matches(self.text(name)?, reference))
    }

    pub fn reset_all(&mut self) {
        for param in &mut self.params {
            param.reset_value();
        }
    }
}

fn not_found(name: &str) -> EngineError {
    EngineError::ParameterNotFound {
        name: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParameterSet {
        ParameterSet::new(vec![
            AnyParameter::integer("Weight", "", 1, |w: &i32| *w > 0, ""),
            AnyParameter::text("Name", "", 0, |s: &String| !s.is_empty(), ""),
            AnyParameter::text("Conditions", "", 5, |_: &String| true, ""),
        ])
        .unwrap()
    }

    #[test]
    fn test_sorted_by_order() {
        let set = sample();
        let names: Vec<&str> = set.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["Name", "Weight", "Conditions"]);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let set = sample();
        assert_eq!(set.find("weight").unwrap().name(), "Weight");
        assert_eq!(set.find("NAME").unwrap().name(), "Name");
        assert_eq!(set.integer("wEiGhT").unwrap(), 0);
    }

    #[test]
    fn test_unknown_name_is_not_found() {
        let set = sample();
        assert_eq!(
            set.integer("Height"),
            Err(EngineError::ParameterNotFound {
                name: "Height".to_string()
            })
        );
    }

    #[test]
    fn test_wrong_type_is_mismatch() {
        let set = sample();
        assert!(matches!(
            set.text("Weight"),
            Err(EngineError::TypeMismatch {
                expected: ParamType::Text,
                actual: ParamType::Integer,
                ..
            })
        ));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = ParameterSet::new(vec![
            AnyParameter::text("Name", "", 0, |_: &String| true, ""),
            AnyParameter::integer("name", "", 1, |_: &i32| true, ""),
        ]);
        assert!(matches!(result, Err(EngineError::DuplicateParameter { .. })));
    }

    #[test]
    fn test_token_helpers_read_text_value() {
        let mut set = sample();
        if let AnyParameter::Text(p) = set.find_mut("conditions").unwrap() {
            p.set_value("Cough Insomnia".to_string());
        }
        assert!(set.contains_token("Conditions", "cough").unwrap());
        assert_eq!(
            set.count_matches("Conditions", &["Insomnia", "Alcoholism"]).unwrap(),
            1
        );
        assert!(set.contains_token("Weight", "cough").is_err());
    }

    #[test]
    fn test_first_of_type() {
        let set = sample();
        assert_eq!(set.first_of_type(ParamType::Text).unwrap().name(), "Name");
        assert!(set.first_of_type(ParamType::Decimal).is_none());
    }
}
