//! Home dashboard widget configuration
//!
//! Widgets are reorderable, toggleable cards. The layout (order +
//! visibility) is the only state; it is persisted as a JSON array under a
//! fixed key and falls back to the default layout on a bad read.

use crate::error::BankableError;
use crate::storage::KeyValueStore;
use crate::Result;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Storage key for the serialized widget layout
pub const WIDGET_CONFIG_STORAGE_KEY: &str = "home_screen_widget_config";

/// Configuration of a single widget on the home screen
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WidgetConfig {
    pub id: String,
    pub kind: String,
    pub title: String,
    pub order: u32,
    pub visible: bool,
    #[serde(default)]
    pub removable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_link: Option<String>,
}

/// A widget type available to add to the board
#[derive(Debug, Clone, Serialize)]
pub struct AvailableWidget {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub removable: bool,
    pub screen_link: Option<&'static str>,
}

lazy_static! {
    /// Every widget type the dashboard knows how to render.
    pub static ref WIDGET_CATALOG: Vec<AvailableWidget> = vec![
        AvailableWidget {
            id: "account-overview",
            title: "Account Overview",
            description: "Balances and financial health at a glance",
            removable: false,
            screen_link: None,
        },
        AvailableWidget {
            id: "daily-affirmation",
            title: "Daily Affirmation",
            description: "A daily nudge to keep you motivated",
            removable: true,
            screen_link: None,
        },
        AvailableWidget {
            id: "quick-actions",
            title: "Quick Actions",
            description: "Transfer money and pay bills",
            removable: true,
            screen_link: None,
        },
        AvailableWidget {
            id: "tomorrow-tracker",
            title: "Tomorrow Tracker",
            description: "Track your emergency fund progress",
            removable: true,
            screen_link: None,
        },
        AvailableWidget {
            id: "recent-transactions",
            title: "Recent Transactions",
            description: "Your latest account activity",
            removable: true,
            screen_link: None,
        },
        AvailableWidget {
            id: "investments",
            title: "Investments",
            description: "Track your portfolio performance",
            removable: true,
            screen_link: Some("/InvestmentsScreen"),
        },
        AvailableWidget {
            id: "group-goals",
            title: "Group Savings",
            description: "Track your group saving goals progress",
            removable: true,
            screen_link: Some("/GroupSavingGoalsScreen"),
        },
    ];
}

fn default_layout() -> Vec<WidgetConfig> {
    ["account-overview", "daily-affirmation", "quick-actions"]
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let descriptor = WIDGET_CATALOG
                .iter()
                .find(|w| w.id == *id)
                .expect("default layout references catalog widgets");
            WidgetConfig {
                id: descriptor.id.to_string(),
                kind: descriptor.id.to_string(),
                title: descriptor.title.to_string(),
                order: i as u32,
                visible: true,
                removable: descriptor.removable,
                screen_link: descriptor.screen_link.map(str::to_string),
            }
        })
        .collect()
}

/// Service managing the widget board and its persistence
pub struct WidgetService {
    store: Arc<dyn KeyValueStore>,
    widgets: RwLock<Vec<WidgetConfig>>,
}

impl WidgetService {
    /// Load the saved layout, falling back to the default layout when the
    /// key is missing or the blob fails to parse.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let widgets = match store.get(WIDGET_CONFIG_STORAGE_KEY).await {
            Ok(Some(blob)) => match serde_json::from_str::<Vec<WidgetConfig>>(&blob) {
                Ok(mut widgets) => {
                    widgets.sort_by_key(|w| w.order);
                    widgets
                }
                Err(e) => {
                    warn!(error = %e, "Stored widget layout failed to parse, using defaults");
                    default_layout()
                }
            },
            Ok(None) => default_layout(),
            Err(e) => {
                warn!(error = %e, "Widget storage read failed, using defaults");
                default_layout()
            }
        };

        info!(widget_count = widgets.len(), "Widget service ready");

        Ok(Self {
            store,
            widgets: RwLock::new(widgets),
        })
    }

    /// Current layout, ordered.
    pub async fn list(&self) -> Vec<WidgetConfig> {
        self.widgets.read().await.clone()
    }

    /// Widget types not yet on the board.
    pub async fn available(&self) -> Vec<AvailableWidget> {
        let widgets = self.widgets.read().await;
        WIDGET_CATALOG
            .iter()
            .filter(|candidate| !widgets.iter().any(|w| w.id == candidate.id))
            .cloned()
            .collect()
    }

    /// Move the widget at `from` to position `to` (splice semantics).
    pub async fn move_widget(&self, from: usize, to: usize) -> Result<Vec<WidgetConfig>> {
        let mut widgets = self.widgets.write().await;

        if from >= widgets.len() || to >= widgets.len() {
            return Err(BankableError::ValidationError(format!(
                "move ({} -> {}) out of bounds for {} widgets",
                from,
                to,
                widgets.len()
            )));
        }

        let moved = widgets.remove(from);
        widgets.insert(to, moved);
        renumber(&mut widgets);
        self.persist(&widgets).await?;

        Ok(widgets.clone())
    }

    /// Add a widget from the catalog to the end of the board.
    pub async fn add(&self, widget_id: &str) -> Result<Vec<WidgetConfig>> {
        let descriptor = WIDGET_CATALOG
            .iter()
            .find(|w| w.id == widget_id)
            .ok_or_else(|| BankableError::NotFound(format!("widget {}", widget_id)))?;

        let mut widgets = self.widgets.write().await;
        if widgets.iter().any(|w| w.id == widget_id) {
            return Err(BankableError::ValidationError(format!(
                "widget {} is already on the board",
                widget_id
            )));
        }

        let order = widgets.len() as u32;
        widgets.push(WidgetConfig {
            id: descriptor.id.to_string(),
            kind: descriptor.id.to_string(),
            title: descriptor.title.to_string(),
            order,
            visible: true,
            removable: descriptor.removable,
            screen_link: descriptor.screen_link.map(str::to_string),
        });
        self.persist(&widgets).await?;

        info!(widget_id = %widget_id, "Widget added");
        Ok(widgets.clone())
    }

    /// Remove a widget. Non-removable widgets stay.
    pub async fn remove(&self, widget_id: &str) -> Result<Vec<WidgetConfig>> {
        let mut widgets = self.widgets.write().await;

        let widget = widgets
            .iter()
            .find(|w| w.id == widget_id)
            .ok_or_else(|| BankableError::NotFound(format!("widget {}", widget_id)))?;

        if !widget.removable {
            return Err(BankableError::ValidationError(format!(
                "widget {} cannot be removed",
                widget_id
            )));
        }

        widgets.retain(|w| w.id != widget_id);
        renumber(&mut widgets);
        self.persist(&widgets).await?;

        info!(widget_id = %widget_id, "Widget removed");
        Ok(widgets.clone())
    }

    /// Show or hide a widget without changing its position.
    pub async fn set_visible(&self, widget_id: &str, visible: bool) -> Result<WidgetConfig> {
        let mut widgets = self.widgets.write().await;

        let widget = widgets
            .iter_mut()
            .find(|w| w.id == widget_id)
            .ok_or_else(|| BankableError::NotFound(format!("widget {}", widget_id)))?;

        widget.visible = visible;
        let updated = widget.clone();
        self.persist(&widgets).await?;

        Ok(updated)
    }

    async fn persist(&self, widgets: &[WidgetConfig]) -> Result<()> {
        let blob = serde_json::to_string(widgets)?;
        self.store.set(WIDGET_CONFIG_STORAGE_KEY, blob).await
    }
}

fn renumber(widgets: &mut [WidgetConfig]) {
    for (i, widget) in widgets.iter_mut().enumerate() {
        widget.order = i as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStore;

    async fn fresh_service() -> WidgetService {
        WidgetService::load(Arc::new(InMemoryStore::new()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_default_layout() {
        let service = fresh_service().await;
        let widgets = service.list().await;

        assert_eq!(widgets.len(), 3);
        assert_eq!(widgets[0].id, "account-overview");
        assert!(!widgets[0].removable);
        assert!(widgets.iter().all(|w| w.visible));
    }

    #[tokio::test]
    async fn test_move_widget_splices_and_renumbers() {
        let service = fresh_service().await;

        let widgets = service.move_widget(0, 2).await.unwrap();
        let ids: Vec<&str> = widgets.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["daily-affirmation", "quick-actions", "account-overview"]
        );
        assert_eq!(
            widgets.iter().map(|w| w.order).collect::<Vec<u32>>(),
            vec![0, 1, 2]
        );
    }

    #[tokio::test]
    async fn test_move_out_of_bounds_rejected() {
        let service = fresh_service().await;
        assert!(service.move_widget(0, 99).await.is_err());
        assert!(service.move_widget(99, 0).await.is_err());
    }

    #[tokio::test]
    async fn test_add_rejects_duplicates_and_unknown() {
        let service = fresh_service().await;

        let widgets = service.add("tomorrow-tracker").await.unwrap();
        assert_eq!(widgets.len(), 4);
        assert_eq!(widgets[3].id, "tomorrow-tracker");
        assert_eq!(widgets[3].order, 3);

        assert!(matches!(
            service.add("tomorrow-tracker").await,
            Err(BankableError::ValidationError(_))
        ));
        assert!(matches!(
            service.add("no-such-widget").await,
            Err(BankableError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_added_widgets_get_sequential_orders() {
        let service = fresh_service().await;

        service.add("tomorrow-tracker").await.unwrap();
        let widgets = service.add("investments").await.unwrap();

        assert_eq!(
            widgets.iter().map(|w| w.order).collect::<Vec<u32>>(),
            vec![0, 1, 2, 3, 4]
        );
        assert_eq!(widgets[4].id, "investments");
    }

    #[tokio::test]
    async fn test_remove_respects_removable_flag() {
        let service = fresh_service().await;

        // account-overview is pinned
        assert!(matches!(
            service.remove("account-overview").await,
            Err(BankableError::ValidationError(_))
        ));

        let widgets = service.remove("quick-actions").await.unwrap();
        assert_eq!(widgets.len(), 2);
        assert!(widgets.iter().all(|w| w.id != "quick-actions"));
    }

    #[tokio::test]
    async fn test_available_excludes_active() {
        let service = fresh_service().await;
        let available = service.available().await;

        assert!(available.iter().all(|w| w.id != "account-overview"));
        assert!(available.iter().any(|w| w.id == "investments"));
    }

    #[tokio::test]
    async fn test_layout_persists_across_reload() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());

        {
            let service = WidgetService::load(store.clone()).await.unwrap();
            service.add("recent-transactions").await.unwrap();
            service.move_widget(3, 0).await.unwrap();
            service.set_visible("quick-actions", false).await.unwrap();
        }

        let reloaded = WidgetService::load(store).await.unwrap();
        let widgets = reloaded.list().await;
        assert_eq!(widgets[0].id, "recent-transactions");
        assert!(!widgets
            .iter()
            .find(|w| w.id == "quick-actions")
            .unwrap()
            .visible);
    }

    #[tokio::test]
    async fn test_corrupt_blob_falls_back_to_defaults() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
        store
            .set(WIDGET_CONFIG_STORAGE_KEY, "{broken".to_string())
            .await
            .unwrap();

        let service = WidgetService::load(store).await.unwrap();
        assert_eq!(service.list().await.len(), 3);
    }
}
