//! Feature-gated navigation and routes
//!
//! Adapters between the access guard and the admin shell. The sidebar is a
//! tree of entries, each optionally carrying a [`FeatureRequirement`]; pages
//! are wrapped by [`gate_route`], which turns the guard's boolean into what
//! the router should do.

use admin_entitlements::{EntitlementSet, FeatureRequirement};
use serde::{Deserialize, Serialize};

/// Sidebar entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    /// Text shown in the sidebar
    pub label: String,
    /// Route; `None` for pure grouping headers
    #[serde(default)]
    pub path: Option<String>,
    /// Gate for this entry and everything under it
    #[serde(default)]
    pub requirement: Option<FeatureRequirement>,
    /// Nested entries
    #[serde(default)]
    pub children: Vec<NavItem>,
}

impl NavItem {
    /// Entry pointing at a route
    pub fn link(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: Some(path.into()),
            requirement: None,
            children: Vec::new(),
        }
    }

    /// Header without a route of its own
    pub fn group(label: impl Into<String>, children: Vec<NavItem>) -> Self {
        Self {
            label: label.into(),
            path: None,
            requirement: None,
            children,
        }
    }

    /// Gate the entry behind a requirement
    pub fn requires(mut self, requirement: FeatureRequirement) -> Self {
        self.requirement = Some(requirement);
        self
    }

    /// Nest entries under this one
    pub fn with_children(mut self, children: Vec<NavItem>) -> Self {
        self.children = children;
        self
    }
}

/// Drop entries the tenant is not entitled to.
///
/// A failing requirement removes the entry with all of its children. A
/// header without a path that ends up with no children is removed too.
pub fn filter_navigation(items: &[NavItem], entitlement: &EntitlementSet) -> Vec<NavItem> {
    items
        .iter()
        .filter_map(|item| {
            if let Some(requirement) = &item.requirement {
                if !requirement.is_satisfied_by(entitlement) {
                    return None;
                }
            }

            let children = filter_navigation(&item.children, entitlement);
            if item.path.is_none() && children.is_empty() {
                return None;
            }

            Some(NavItem {
                label: item.label.clone(),
                path: item.path.clone(),
                requirement: item.requirement.clone(),
                children,
            })
        })
        .collect()
}

/// What to do when a gated page is not available
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateFallback {
    /// Send the user elsewhere, typically an upgrade page
    Redirect(String),
    /// Render a locked placeholder in place of the page
    Locked,
}

/// Router decision for a gated page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateDecision {
    /// Requirement met, show the page
    Render,
    /// Navigate away instead
    Redirect {
        /// Target route
        to: String,
    },
    /// Show the locked placeholder
    Locked {
        /// Features the tenant would need
        missing: Vec<String>,
    },
}

/// Route wrapper: consult the guard and translate a denial into the caller's fallback
pub fn gate_route(
    requirement: &FeatureRequirement,
    entitlement: &EntitlementSet,
    fallback: &GateFallback,
) -> GateDecision {
    if requirement.is_satisfied_by(entitlement) {
        return GateDecision::Render;
    }
    match fallback {
        GateFallback::Redirect(to) => GateDecision::Redirect { to: to.clone() },
        GateFallback::Locked => GateDecision::Locked {
            missing: requirement.missing(entitlement),
        },
    }
}
