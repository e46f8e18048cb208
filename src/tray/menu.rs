//! Context menu building and event handling
//!
//! The menu is a pure function of service liveness: one item per service,
//! enabled iff that service is running, plus Exit. Menu clicks are mapped to
//! the `MenuAction` enum through the id table instead of per-item callbacks.

use crate::error::Result;
use crate::supervisor::ServiceStatus;
use log::info;
use muda::{Menu, MenuEvent as MudaMenuEvent, MenuItem, PredefinedMenuItem};
use std::collections::HashMap;

/// Menu item identifiers
pub const MENU_ID_EXIT: &str = "exit";
pub const MENU_PREFIX_OPEN: &str = "open_";

/// Actions triggered from the menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// Open the named service's URL in the default browser
    OpenUrl(String),
    /// Exit the launcher, stopping all services
    Exit,
}

/// Builds the context menu and maps item ids back to actions
pub struct MenuBuilder {
    item_map: HashMap<String, MenuAction>,
}

impl MenuBuilder {
    pub fn new() -> Self {
        Self {
            item_map: HashMap::new(),
        }
    }

    /// Build the context menu from the current liveness snapshot
    pub fn build(&mut self, statuses: &[ServiceStatus]) -> Result<Menu> {
        self.item_map.clear();
        let menu = Menu::new();

        for status in statuses {
            let id = format!("{}{}", MENU_PREFIX_OPEN, status.name);
            let item = MenuItem::with_id(&id, display_label(&status.name), status.running, None);
            menu.append(&item)?;
            self.item_map
                .insert(id, MenuAction::OpenUrl(status.name.clone()));
        }

        menu.append(&PredefinedMenuItem::separator())?;

        let exit_item = MenuItem::with_id(MENU_ID_EXIT, "Exit", true, None);
        menu.append(&exit_item)?;

        Ok(menu)
    }

    /// Convert a muda menu event to a `MenuAction`
    pub fn handle_event(&self, event: &MudaMenuEvent) -> Option<MenuAction> {
        let id = event.id().0.as_str();
        info!("Menu event received: '{}'", id);
        self.action_for_id(id)
    }

    /// Look up the action registered for a menu item id
    pub fn action_for_id(&self, id: &str) -> Option<MenuAction> {
        match id {
            MENU_ID_EXIT => Some(MenuAction::Exit),
            _ => self.item_map.get(id).cloned(),
        }
    }
}

impl Default for MenuBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Menu label for a service name: first letter upper-cased
fn display_label(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_builder_new() {
        let builder = MenuBuilder::new();
        assert!(builder.item_map.is_empty());
    }

    #[test]
    fn test_exit_id_maps_without_build() {
        let builder = MenuBuilder::new();
        assert_eq!(builder.action_for_id(MENU_ID_EXIT), Some(MenuAction::Exit));
        assert_eq!(builder.action_for_id("open_frontend"), None);
        assert_eq!(builder.action_for_id("bogus"), None);
    }

    #[test]
    fn test_display_label() {
        assert_eq!(display_label("frontend"), "Frontend");
        assert_eq!(display_label("backend"), "Backend");
        assert_eq!(display_label(""), "");
    }
}
