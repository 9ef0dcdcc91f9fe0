//! What the explorer window currently shows.

use std::collections::BTreeSet;

use tokio::sync::RwLock;

use deskfs_entity::id::ItemId;
use deskfs_entity::item::{Item, ItemStatus};

/// Identifies one navigation. A response carrying an older token is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NavigationToken(u64);

/// Copy of the displayed folder taken before an optimistic change.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSnapshot {
    token: NavigationToken,
    items: Vec<Item>,
}

impl ViewSnapshot {
    /// The captured items.
    pub fn items(&self) -> &[Item] {
        &self.items
    }
}

/// Observable state of the explorer.
#[derive(Debug, Clone)]
pub struct ExplorerView {
    /// Folder being displayed.
    pub current_folder: ItemId,
    /// Items of that folder, sorted.
    pub items: Vec<Item>,
    /// Selected item ids.
    pub selection: BTreeSet<ItemId>,
    /// A listing is in flight with nothing cached to show.
    pub loading: bool,
    /// Recycle bin folder, once found in root.
    pub recycle_bin_id: Option<ItemId>,
}

impl Default for ExplorerView {
    fn default() -> Self {
        Self {
            current_folder: ItemId::root(),
            items: Vec::new(),
            selection: BTreeSet::new(),
            loading: false,
            recycle_bin_id: None,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    view: ExplorerView,
    token: u64,
}

/// Shared explorer state.
///
/// Every navigation issues a new [`NavigationToken`]; writers that finish
/// asynchronously must present the token they started with, so a late
/// response never overwrites another folder's view.
#[derive(Debug, Default)]
pub struct ExplorerState {
    inner: RwLock<Inner>,
}

impl ExplorerState {
    /// Create an explorer showing root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current view.
    pub async fn view(&self) -> ExplorerView {
        self.inner.read().await.view.clone()
    }

    /// Folder being displayed.
    pub async fn current_folder(&self) -> ItemId {
        self.inner.read().await.view.current_folder.clone()
    }

    /// Items being displayed.
    pub async fn items(&self) -> Vec<Item> {
        self.inner.read().await.view.items.clone()
    }

    /// Token of the active navigation.
    pub async fn current_token(&self) -> NavigationToken {
        NavigationToken(self.inner.read().await.token)
    }

    /// Whether `token` still belongs to the active navigation.
    pub async fn is_current(&self, token: NavigationToken) -> bool {
        self.inner.read().await.token == token.0
    }

    /// Switch to another folder and clear the selection.
    pub async fn begin_navigation(&self, folder_id: &ItemId) -> NavigationToken {
        let mut inner = self.inner.write().await;
        inner.token += 1;
        inner.view.current_folder = folder_id.clone();
        inner.view.items.clear();
        inner.view.selection.clear();
        inner.view.loading = true;
        NavigationToken(inner.token)
    }

    /// Show items for the navigation `token`. Ignored when stale.
    pub async fn show_items(&self, token: NavigationToken, items: Vec<Item>) -> bool {
        let mut inner = self.inner.write().await;
        if inner.token != token.0 {
            return false;
        }
        let visible: BTreeSet<&ItemId> = items.iter().map(|item| &item.id).collect();
        let selection = inner
            .view
            .selection
            .iter()
            .filter(|id| visible.contains(id))
            .cloned()
            .collect();
        inner.view.selection = selection;
        inner.view.items = items;
        inner.view.loading = false;
        true
    }

    /// Clear the loading flag of navigation `token`.
    pub async fn finish_loading(&self, token: NavigationToken) {
        let mut inner = self.inner.write().await;
        if inner.token == token.0 {
            inner.view.loading = false;
        }
    }

    /// Recycle bin folder id, if known.
    pub async fn recycle_bin_id(&self) -> Option<ItemId> {
        self.inner.read().await.view.recycle_bin_id.clone()
    }

    /// Record the recycle bin folder id.
    pub async fn set_recycle_bin(&self, id: Option<ItemId>) {
        self.inner.write().await.view.recycle_bin_id = id;
    }

    /// Selected ids, in id order.
    pub async fn selection(&self) -> Vec<ItemId> {
        self.inner
            .read()
            .await
            .view
            .selection
            .iter()
            .cloned()
            .collect()
    }

    /// Replace the selection with the given ids.
    pub async fn select<I>(&self, ids: I)
    where
        I: IntoIterator<Item = ItemId>,
    {
        self.inner.write().await.view.selection = ids.into_iter().collect();
    }

    /// Clear the selection.
    pub async fn clear_selection(&self) {
        self.inner.write().await.view.selection.clear();
    }

    /// Capture the displayed items before an optimistic change.
    pub async fn capture(&self) -> ViewSnapshot {
        let inner = self.inner.read().await;
        ViewSnapshot {
            token: NavigationToken(inner.token),
            items: inner.view.items.clone(),
        }
    }

    /// Put a captured item list back. Ignored if the user navigated away.
    pub async fn restore(&self, snapshot: ViewSnapshot) -> bool {
        let mut inner = self.inner.write().await;
        if inner.token != snapshot.token.0 {
            return false;
        }
        inner.view.items = snapshot.items;
        true
    }

    /// Set the transient status of the given items.
    pub async fn set_status(&self, ids: &[ItemId], status: ItemStatus) {
        let mut inner = self.inner.write().await;
        for item in inner.view.items.iter_mut() {
            if ids.contains(&item.id) {
                item.status = status;
            }
        }
    }

    /// Append a placeholder item.
    pub async fn push_placeholder(&self, item: Item) {
        self.inner.write().await.view.items.push(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskfs_entity::item::ItemKind;

    fn items(names: &[&str]) -> Vec<Item> {
        names
            .iter()
            .map(|n| Item::new(*n, ItemKind::Note, *n))
            .collect()
    }

    #[tokio::test]
    async fn test_stale_token_is_ignored() {
        let explorer = ExplorerState::new();
        let first = explorer.begin_navigation(&ItemId::from("a")).await;
        let second = explorer.begin_navigation(&ItemId::from("b")).await;

        assert!(!explorer.show_items(first, items(&["from-a"])).await);
        assert!(explorer.show_items(second, items(&["from-b"])).await);

        let view = explorer.view().await;
        assert_eq!(view.current_folder, ItemId::from("b"));
        assert_eq!(view.items[0].name, "from-b");
        assert!(!view.loading);
    }

    #[tokio::test]
    async fn test_restore_undoes_status_change() {
        let explorer = ExplorerState::new();
        let token = explorer.begin_navigation(&ItemId::root()).await;
        explorer.show_items(token, items(&["x", "y"])).await;

        let before = explorer.capture().await;
        explorer.set_status(&[ItemId::from("x")], ItemStatus::Moving).await;
        assert_eq!(explorer.items().await[0].status, ItemStatus::Moving);

        assert!(explorer.restore(before.clone()).await);
        assert_eq!(explorer.items().await, before.items());
    }

    #[tokio::test]
    async fn test_restore_after_navigation_is_ignored() {
        let explorer = ExplorerState::new();
        let token = explorer.begin_navigation(&ItemId::root()).await;
        explorer.show_items(token, items(&["x"])).await;
        let before = explorer.capture().await;

        let other = explorer.begin_navigation(&ItemId::from("f")).await;
        explorer.show_items(other, items(&["z"])).await;
        assert!(!explorer.restore(before).await);
        assert_eq!(explorer.items().await[0].name, "z");
    }

    #[tokio::test]
    async fn test_selection_pruned_to_visible_items() {
        let explorer = ExplorerState::new();
        let token = explorer.begin_navigation(&ItemId::root()).await;
        explorer.show_items(token, items(&["x", "y"])).await;
        explorer.select([ItemId::from("x"), ItemId::from("y")]).await;

        explorer.show_items(token, items(&["y"])).await;
        assert_eq!(explorer.selection().await, vec![ItemId::from("y")]);
    }
}
