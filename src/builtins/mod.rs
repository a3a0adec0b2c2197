//! Commands every frame provides.
use crate::registry::CommandRegistry;

mod cd;
mod complete;
mod data;
mod echo;
mod help;
mod history;
mod view;

pub use view::ViewKind;

pub fn register_all(registry: &mut CommandRegistry) {
    registry.register(cd::Cd);
    registry.register(complete::Complete);
    registry.register(data::SetData);
    registry.register(data::GetData);
    registry.register(echo::Echo);
    registry.register(help::Help);
    registry.register(history::HistoryCommand);
    for kind in ViewKind::all() {
        registry.register(view::View::new(*kind));
    }
}
