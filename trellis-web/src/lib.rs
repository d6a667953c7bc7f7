use trellis_ui::hot::BehaviorResolver;
use trellis_ui::{hot_mount, HotModule, Mount, MountRef, NodeId, RenderConfig, Widget};
use wasm_bindgen::prelude::*;

pub mod dom;

pub use dom::DomFactory;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Factory for the current document, with the element `container_id`
/// adopted as the mount container
pub fn attach(container_id: &str) -> Result<(DomFactory, NodeId), JsValue> {
    let mut factory = DomFactory::from_window()?;
    let container = web_sys::window()
        .ok_or("no window")?
        .document()
        .ok_or("no document")?
        .get_element_by_id(container_id)
        .ok_or("container not found")?;
    let id = factory.adopt(container.into());
    Ok((factory, id))
}

/// Render `widget` into the DOM element `container_id`
///
/// # Arguments
/// * `container_id` - DOM element ID to mount the widget tree into
/// * `widget` - root widget
pub fn mount_to_element(container_id: &str, widget: &Widget) -> Result<Mount<DomFactory>, JsValue> {
    let (factory, container) = attach(container_id)?;
    Ok(Mount::new(factory, container, widget))
}

/// Like [`mount_to_element`], but reuses the mount stashed in `hot` by a
/// previous module instance
pub fn hot_mount_to_element(
    hot: Option<&mut dyn HotModule>,
    container_id: &str,
    widget: &Widget,
    resolver: &dyn BehaviorResolver,
    config: RenderConfig,
) -> Result<MountRef<DomFactory>, JsValue> {
    // Resolve the container up front so a bad id fails before the stash is touched
    let (factory, container) = attach(container_id)?;
    let mount = hot_mount(hot, widget, resolver, config, move || (factory, container));
    Ok(mount)
}
