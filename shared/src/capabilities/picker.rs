use chrono::NaiveDateTime;
use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PickerMode {
    Date,
    Time,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum PickerOperation {
    Show { mode: PickerMode },
}

impl Operation for PickerOperation {
    type Output = PickerOutput;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum PickerOutput {
    Confirmed(NaiveDateTime),
    Cancelled,
}

/// Native date/time picker modal. The core only forwards what the user chose.
pub struct Picker<Ev> {
    context: CapabilityContext<PickerOperation, Ev>,
}

impl<Ev> Capability<Ev> for Picker<Ev> {
    type Operation = PickerOperation;
    type MappedSelf<MappedEv> = Picker<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Picker::new(self.context.map_event(f))
    }
}

impl<Ev> Picker<Ev>
where
    Ev: Send + 'static,
{
    pub fn new(context: CapabilityContext<PickerOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn show<F>(&self, mode: PickerMode, callback: F)
    where
        F: FnOnce(PickerOutput) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let output = ctx.request_from_shell(PickerOperation::Show { mode }).await;
            ctx.update_app(callback(output));
        });
    }
}
