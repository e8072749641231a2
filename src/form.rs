//! Manual product form and login form
//!
//! Both forms keep raw text exactly as typed and only convert on `validate()`,
//! which is the single gate before any backend call.

use crate::api::types::ProductDraft;
use crate::catalog;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Veuillez remplir tous les champs obligatoires")]
    MissingFields(Vec<&'static str>),

    #[error("Prix invalide : {0}")]
    InvalidPrice(String),

    #[error("Veuillez renseigner le nom d'utilisateur et le mot de passe")]
    MissingCredentials,

    #[error("Veuillez renseigner une adresse email")]
    MissingEmail,
}

/// Parse a price typed with either `.` or `,` as decimal separator
pub fn parse_price(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace(',', ".");
    let value: f64 = normalized.parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    pub name: String,
    pub brand: String,
    pub category: String,
    pub gender: String,
    pub price: String,
    pub old_price: String,
    pub sku: String,
    pub description: String,
    pub short_description: String,
    pub material: String,
    pub season: String,
    /// One feature per line
    pub features: String,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub images: Vec<String>,
}

impl ProductForm {
    /// Sizes offered for the current category/gender
    pub fn available_sizes(&self) -> Vec<String> {
        catalog::sizes_for(&self.category, &self.gender)
    }

    pub fn set_category(&mut self, category: &str) {
        self.category = category.to_string();
        self.prune_sizes();
    }

    pub fn set_gender(&mut self, gender: &str) {
        self.gender = gender.to_string();
        self.prune_sizes();
    }

    fn prune_sizes(&mut self) {
        let offered = self.available_sizes();
        self.sizes.retain(|s| offered.contains(s));
    }

    pub fn toggle_size(&mut self, size: &str) {
        toggle(&mut self.sizes, size);
    }

    pub fn toggle_color(&mut self, color: &str) {
        toggle(&mut self.colors, color);
    }

    /// Uploading replaces any previous image
    pub fn set_image(&mut self, url: String) {
        self.images = vec![url];
    }

    pub fn feature_list(&self) -> Vec<String> {
        self.features
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect()
    }

    /// Live discount badge for the preview
    pub fn discount(&self) -> Option<i64> {
        let price = parse_price(&self.price)?;
        catalog::discount_percent(price, parse_price(&self.old_price))
    }

    pub fn validate(&self) -> Result<ProductDraft, FormError> {
        let required = [
            ("nom", &self.name),
            ("marque", &self.brand),
            ("catégorie", &self.category),
            ("genre", &self.gender),
            ("prix", &self.price),
        ];
        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, v)| v.trim().is_empty())
            .map(|(k, _)| *k)
            .collect();
        if !missing.is_empty() {
            return Err(FormError::MissingFields(missing));
        }

        let price =
            parse_price(&self.price).ok_or_else(|| FormError::InvalidPrice(self.price.clone()))?;
        let old_price = if self.old_price.trim().is_empty() {
            None
        } else {
            Some(
                parse_price(&self.old_price)
                    .ok_or_else(|| FormError::InvalidPrice(self.old_price.clone()))?,
            )
        };

        Ok(ProductDraft {
            name: self.name.trim().to_string(),
            brand: self.brand.trim().to_string(),
            category: self.category.clone(),
            gender: self.gender.clone(),
            price,
            old_price,
            sku: self.sku.trim().to_string(),
            description: self.description.clone(),
            short_description: self.short_description.clone(),
            material: self.material.clone(),
            season: self.season.clone(),
            features: self.feature_list(),
            sizes: self.sizes.clone(),
            colors: self.colors.clone(),
            images: self.images.clone(),
        })
    }
}

fn toggle(list: &mut Vec<String>, value: &str) {
    if let Some(pos) = list.iter().position(|v| v == value) {
        list.remove(pos);
    } else {
        list.push(value.to_string());
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub mode: AuthMode,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
    }

    pub fn validate(&self) -> Result<(), FormError> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            return Err(FormError::MissingCredentials);
        }
        if self.mode == AuthMode::Register && self.email.trim().is_empty() {
            return Err(FormError::MissingEmail);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ProductForm {
        ProductForm {
            name: "Sweat Club".to_string(),
            brand: "Nike".to_string(),
            category: "sweats".to_string(),
            gender: "homme".to_string(),
            price: "59,99".to_string(),
            features: "Coton bio\n\n  Capuche ajustable  \n".to_string(),
            ..ProductForm::default()
        }
    }

    #[test]
    fn missing_fields_block_submission() {
        let form = ProductForm {
            brand: String::new(),
            ..filled()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err, FormError::MissingFields(vec!["marque"]));
        assert_eq!(
            err.to_string(),
            "Veuillez remplir tous les champs obligatoires"
        );
    }

    #[test]
    fn valid_form_builds_draft() {
        let draft = filled().validate().unwrap();
        assert_eq!(draft.price, 59.99);
        assert_eq!(draft.old_price, None);
        assert_eq!(draft.features, vec!["Coton bio", "Capuche ajustable"]);
    }

    #[test]
    fn invalid_price_is_rejected() {
        let form = ProductForm {
            price: "abc".to_string(),
            ..filled()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err, FormError::InvalidPrice("abc".to_string()));
        assert_eq!(err.to_string(), "Prix invalide : abc");

        let form = ProductForm {
            old_price: "-3".to_string(),
            ..filled()
        };
        assert!(matches!(form.validate(), Err(FormError::InvalidPrice(_))));
    }

    #[test]
    fn changing_gender_drops_unavailable_sizes() {
        let mut form = filled();
        form.toggle_size("M");
        form.toggle_size("XL");
        form.set_gender("enfant");
        assert!(form.sizes.is_empty());

        form.toggle_size("8A");
        form.set_category("survetements");
        assert_eq!(form.sizes, vec!["8A"]);
        form.set_category("chaussures-running");
        assert!(form.sizes.is_empty());
    }

    #[test]
    fn toggles_add_and_remove() {
        let mut form = ProductForm::default();
        form.toggle_color("Noir");
        form.toggle_color("Blanc");
        form.toggle_color("Noir");
        assert_eq!(form.colors, vec!["Blanc"]);
    }

    #[test]
    fn discount_follows_typed_prices() {
        let mut form = filled();
        form.price = "80".to_string();
        form.old_price = "100".to_string();
        assert_eq!(form.discount(), Some(20));
        form.old_price = "70".to_string();
        assert_eq!(form.discount(), None);
    }

    #[test]
    fn login_requires_username_and_password() {
        let mut form = LoginForm {
            password: "secret".to_string(),
            ..LoginForm::default()
        };
        assert_eq!(form.validate(), Err(FormError::MissingCredentials));

        form.username = "alice".to_string();
        assert!(form.validate().is_ok());

        form.toggle_mode();
        assert_eq!(form.validate(), Err(FormError::MissingEmail));
    }
}
