use crate::config::StoreConfig;
use crate::state::models::{Category, Condition, Location, Post, User};

/// The marketplace's observable state.
///
/// Fields are only writable inside the crate; views read them through the
/// accessors below, either on a snapshot or inside a subscriber.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketState {
    pub(crate) is_data_ready: bool,
    pub(crate) local_data_url: String,
    pub(crate) post_images_path: String,
    pub(crate) post_responsive_images_path: String,
    pub(crate) posts: Vec<Post>,
    pub(crate) user_location: Option<Location>,
    pub(crate) current_user: Option<User>,
    pub(crate) is_user_authenticated: bool,
    pub(crate) post_categories: Vec<Category>,
    // Backs both the post_conditions accessor and set_post_conditions.
    pub(crate) post_conditions: Vec<Condition>,
    pub(crate) search_term: String,
}

impl MarketState {
    /// Startup defaults with asset paths derived from `config`.
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            is_data_ready: false,
            local_data_url: config.local_data_url(),
            post_images_path: config.post_images_path(),
            post_responsive_images_path: config.post_responsive_images_path(),
            posts: Vec::new(),
            user_location: None,
            current_user: None,
            is_user_authenticated: false,
            post_categories: Vec::new(),
            post_conditions: Vec::new(),
            search_term: String::new(),
        }
    }

    /// Whether the primary listing fetch has completed.
    pub fn is_data_ready(&self) -> bool {
        self.is_data_ready
    }

    /// Base URL of the bundled JSON data.
    pub fn local_data_url(&self) -> &str {
        &self.local_data_url
    }

    /// Directory holding full-size post images.
    pub fn post_images_path(&self) -> &str {
        &self.post_images_path
    }

    /// Directory holding resized post images.
    pub fn post_responsive_images_path(&self) -> &str {
        &self.post_responsive_images_path
    }

    /// The current listing.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Where the user is browsing from, if known.
    pub fn user_location(&self) -> Option<&Location> {
        self.user_location.as_ref()
    }

    /// The signed-in user, if any.
    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    /// Whether a user is signed in.
    pub fn is_user_authenticated(&self) -> bool {
        self.is_user_authenticated
    }

    /// Category taxonomy.
    pub fn post_categories(&self) -> &[Category] {
        &self.post_categories
    }

    /// Condition taxonomy.
    pub fn post_conditions(&self) -> &[Condition] {
        &self.post_conditions
    }

    /// The current search text.
    pub fn search_term(&self) -> &str {
        &self.search_term
    }
}

impl Default for MarketState {
    fn default() -> Self {
        Self::new(&StoreConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let state = MarketState::new(&StoreConfig::default().with_base_url("/sale/"));

        assert!(!state.is_data_ready());
        assert!(!state.is_user_authenticated());
        assert_eq!(state.local_data_url(), "/sale/data/");
        assert_eq!(state.post_images_path(), "/sale/img/posts/");
        assert_eq!(
            state.post_responsive_images_path(),
            "/sale/img/responsive/posts/"
        );
        assert!(state.posts().is_empty());
        assert!(state.post_categories().is_empty());
        assert!(state.post_conditions().is_empty());
        assert!(state.user_location().is_none());
        assert!(state.current_user().is_none());
        assert_eq!(state.search_term(), "");
    }
}
