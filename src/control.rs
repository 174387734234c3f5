//! Stateless form button: validity/dirtiness in, enabled state and style classes out.

// self
use crate::_prelude::*;

/// Legacy class-name string selecting [`ButtonStyle::CancelRed`].
pub const CANCEL_STYLE_RED: &str = "cancel_style_red";

const BASE_CLASS: &str = "cancel";

/// Visual variants of the button.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
	/// Base style.
	#[default]
	Standard,
	/// Base style plus the red cancel accent.
	CancelRed,
}
impl ButtonStyle {
	/// Maps a legacy `className` prop; only [`CANCEL_STYLE_RED`] selects the red variant.
	pub fn from_class_name(class_name: Option<&str>) -> Self {
		match class_name {
			Some(CANCEL_STYLE_RED) => Self::CancelRed,
			_ => Self::Standard,
		}
	}

	/// CSS classes applied for this style.
	pub const fn class_names(self) -> &'static [&'static str] {
		match self {
			Self::Standard => &[BASE_CLASS],
			Self::CancelRed => &[BASE_CLASS, CANCEL_STYLE_RED],
		}
	}
}

/// Opaque click payload forwarded untouched to the handler.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClickEvent {
	/// Host-defined identifier of the originating element.
	pub source: Option<String>,
}

/// Click handler prop.
pub type ClickHandler = Arc<dyn Fn(&ClickEvent) + Send + Sync>;

/// Inputs of the button.
#[derive(Clone, Default)]
pub struct ButtonProps {
	/// Label.
	pub text: String,
	/// Visual variant.
	pub style: ButtonStyle,
	/// Whether the form has unsaved changes; absent counts as `false`.
	pub is_dirty: Option<bool>,
	/// Whether the form passes validation; absent counts as `false`.
	pub is_valid: Option<bool>,
	/// Click handler, if any.
	pub on_click: Option<ClickHandler>,
}
impl ButtonProps {
	/// Props with a label and every other field at its default.
	pub fn new(text: impl Into<String>) -> Self {
		Self { text: text.into(), ..Default::default() }
	}

	/// Sets the visual variant.
	pub fn with_style(mut self, style: ButtonStyle) -> Self {
		self.style = style;

		self
	}

	/// Sets the form flags.
	pub fn with_form_state(mut self, is_dirty: bool, is_valid: bool) -> Self {
		self.is_dirty = Some(is_dirty);
		self.is_valid = Some(is_valid);

		self
	}

	/// Sets the click handler.
	pub fn on_click(mut self, handler: impl Fn(&ClickEvent) + Send + Sync + 'static) -> Self {
		self.on_click = Some(Arc::new(handler));

		self
	}

	/// Renders the props.
	pub fn render(&self) -> RenderedButton {
		let enabled = self.is_dirty == Some(true) && self.is_valid == Some(true);

		RenderedButton {
			label: self.text.clone(),
			class_names: self.style.class_names().to_vec(),
			disabled: !enabled,
			kind: "button",
			on_click: self.on_click.clone(),
		}
	}
}
impl Debug for ButtonProps {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ButtonProps")
			.field("text", &self.text)
			.field("style", &self.style)
			.field("is_dirty", &self.is_dirty)
			.field("is_valid", &self.is_valid)
			.field("on_click_set", &self.on_click.is_some())
			.finish()
	}
}

/// Render output of [`ButtonProps::render`].
#[derive(Clone)]
pub struct RenderedButton {
	/// Visible label.
	pub label: String,
	/// CSS classes, base class first.
	pub class_names: Vec<&'static str>,
	/// Disabled state.
	pub disabled: bool,
	/// Button `type` attribute; always `button`, never a form submit.
	pub kind: &'static str,
	on_click: Option<ClickHandler>,
}
impl RenderedButton {
	/// Space-joined class attribute.
	pub fn class_attr(&self) -> String {
		self.class_names.join(" ")
	}

	/// Delivers a click. Returns `true` when a handler received it; disabled buttons swallow
	/// clicks.
	pub fn click(&self, event: &ClickEvent) -> bool {
		match &self.on_click {
			Some(handler) if !self.disabled => {
				handler(event);

				true
			},
			_ => false,
		}
	}
}
impl Debug for RenderedButton {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RenderedButton")
			.field("label", &self.label)
			.field("class_names", &self.class_names)
			.field("disabled", &self.disabled)
			.field("kind", &self.kind)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn enabled_only_when_dirty_and_valid() {
		let cases = [
			(Some(false), Some(true), true),
			(Some(true), Some(false), true),
			(Some(false), Some(false), true),
			(None, Some(true), true),
			(Some(true), None, true),
			(None, None, true),
			(Some(true), Some(true), false),
		];

		for (is_dirty, is_valid, disabled) in cases {
			let props = ButtonProps { is_dirty, is_valid, ..ButtonProps::new("Save") };

			assert_eq!(props.render().disabled, disabled, "dirty={is_dirty:?} valid={is_valid:?}");
		}
	}

	#[test]
	fn style_variant_selects_classes() {
		assert_eq!(ButtonStyle::from_class_name(Some("cancel_style_red")), ButtonStyle::CancelRed);
		assert_eq!(ButtonStyle::from_class_name(Some("cancel_style_blue")), ButtonStyle::Standard);
		assert_eq!(ButtonStyle::from_class_name(None), ButtonStyle::Standard);

		let standard = ButtonProps::new("Cancel").render();
		let red = ButtonProps::new("Cancel").with_style(ButtonStyle::CancelRed).render();

		assert_eq!(standard.class_attr(), "cancel");
		assert_eq!(red.class_attr(), "cancel cancel_style_red");
		assert_eq!(red.kind, "button");
		assert_eq!(red.label, "Cancel");
	}

	#[test]
	fn clicks_forward_verbatim_only_while_enabled() {
		let seen = Arc::new(Mutex::new(Vec::new()));
		let sink = seen.clone();
		let props = ButtonProps::new("Delete")
			.on_click(move |event: &ClickEvent| sink.lock().push(event.clone()));
		let event = ClickEvent { source: Some("delete-plan".into()) };

		assert!(!props.render().click(&event));
		assert!(seen.lock().is_empty());
		assert!(props.with_form_state(true, true).render().click(&event));
		assert_eq!(*seen.lock(), vec![event]);
	}
}
