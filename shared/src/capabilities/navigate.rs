use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

use crate::model::{ItemId, Tab};

/// Screens the shell router knows about.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum Route {
    Tabs { tab: Tab },
    Destination { id: ItemId },
    Category { slug: String },
    AllDestinations,
    Search,
    Profile,
}

impl Route {
    /// Category routes are keyed by the lower-cased category name.
    #[must_use]
    pub fn category(name: &str) -> Self {
        Self::Category {
            slug: name.to_lowercase(),
        }
    }

    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Tabs { tab } => format!("/(tabs)/{}", tab.route_segment()),
            Self::Destination { id } => format!("/destination/{id}"),
            Self::Category { slug } => format!("/category/{slug}"),
            Self::AllDestinations => "/all-destinations".into(),
            Self::Search => "/search".into(),
            Self::Profile => "/profile".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum NavigateOperation {
    Push { route: Route, path: String },
}

impl Operation for NavigateOperation {
    type Output = ();
}

pub struct Navigate<Ev> {
    context: CapabilityContext<NavigateOperation, Ev>,
}

impl<Ev> Capability<Ev> for Navigate<Ev> {
    type Operation = NavigateOperation;
    type MappedSelf<MappedEv> = Navigate<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Navigate::new(self.context.map_event(f))
    }
}

impl<Ev> Navigate<Ev>
where
    Ev: Send + 'static,
{
    pub fn new(context: CapabilityContext<NavigateOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn push(&self, route: Route) {
        let path = route.path();
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.notify_shell(NavigateOperation::Push { route, path }).await;
        });
    }
}
