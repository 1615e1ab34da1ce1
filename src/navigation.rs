use serde::Serialize;

use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavItem {
    pub title: &'static str,
    pub url: &'static str,
    pub icon: &'static str,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SidebarUser {
    pub name: String,
    pub email: String,
    pub avatar: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sidebar {
    pub user: SidebarUser,
    pub show_logo: bool,
    pub items: Vec<NavItem>,
}

const ADMIN_ITEMS: [(&str, &str, &str); 3] = [
    ("Dashboard", "/admin/dashboard", "square-terminal"),
    ("Collections", "/admin/collections", "package"),
    ("Categories", "/admin/categories", "store"),
];

/// Admin navigation with the item owning `current_path` marked active
pub fn admin_items(current_path: &str) -> Vec<NavItem> {
    ADMIN_ITEMS
        .iter()
        .map(|&(title, url, icon)| NavItem {
            title,
            url,
            icon,
            is_active: current_path == url || current_path.starts_with(&format!("{}/", url)),
        })
        .collect()
}

pub fn sidebar(session: Option<&Session>, current_path: &str) -> Sidebar {
    let user = session.and_then(|s| s.user.as_ref());
    Sidebar {
        user: SidebarUser {
            name: user.and_then(|u| u.name.clone()).unwrap_or_default(),
            email: user.and_then(|u| u.email.clone()).unwrap_or_default(),
            avatar: user.and_then(|u| u.image.clone()).unwrap_or_default(),
        },
        show_logo: session.map_or(false, Session::is_admin),
        items: admin_items(current_path),
    }
}
