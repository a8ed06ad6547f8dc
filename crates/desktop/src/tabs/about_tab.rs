use iced::widget::{column, text, Space};
use iced::Element;

use crate::app::{scaled, Message};

pub fn view(fs: f32) -> Element<'static, Message> {
    let version = env!("CARGO_PKG_VERSION");

    column![
        text("FaceLens").size(scaled(22.0, fs)),
        Space::new().height(4),
        text(format!("Version {version}")).size(scaled(13.0, fs)),
        Space::new().height(12),
        text(
            "Upload an image or use your webcam to detect faces. Images are sent \
             to the detection backend configured under Settings, which returns \
             the faces it found along with an annotated copy of the image."
        )
        .size(scaled(13.0, fs)),
        Space::new().height(12),
        text(
            "Apart from its settings, FaceLens writes nothing to disk. The \
             annotated image is saved only when you choose Download Result."
        )
        .size(scaled(13.0, fs)),
    ]
    .spacing(0)
    .into()
}
