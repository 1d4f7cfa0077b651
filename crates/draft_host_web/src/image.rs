//! Canvas-backed image compressor.

use draft_host::{ImageCompressor, ImageError, ImageFuture};

#[derive(Debug, Clone, Copy, Default)]
/// Browser compressor: decodes through `HTMLImageElement`, redraws on a 2d canvas at the scaled
/// size, and re-encodes with `canvas.toDataURL("image/jpeg", quality)`.
pub struct CanvasImageCompressor;

impl ImageCompressor for CanvasImageCompressor {
    fn compress<'a>(
        &'a self,
        data_url: &'a str,
        max_width: u32,
        quality: f64,
    ) -> ImageFuture<'a, Result<String, ImageError>> {
        Box::pin(async move {
            #[cfg(target_arch = "wasm32")]
            {
                canvas::compress(data_url, max_width, quality).await
            }

            #[cfg(not(target_arch = "wasm32"))]
            {
                let _ = (data_url, max_width, quality);
                Err(ImageError::Unsupported(
                    "canvas compression is only available when compiled for wasm32".to_string(),
                ))
            }
        })
    }
}

#[cfg(target_arch = "wasm32")]
mod canvas {
    use std::{cell::RefCell, rc::Rc};

    use draft_host::{
        clamp_quality, scaled_dimensions, ImageDimensions, ImageError, COMPRESSED_MIME_TYPE,
    };
    use futures::channel::oneshot;
    use wasm_bindgen::{closure::Closure, JsCast, JsValue};

    pub(super) async fn compress(
        data_url: &str,
        max_width: u32,
        quality: f64,
    ) -> Result<String, ImageError> {
        let image = load_image(data_url).await?;
        let source = ImageDimensions::new(image.natural_width(), image.natural_height());
        if source.width == 0 || source.height == 0 {
            return Err(ImageError::Decode("image has no pixels".to_string()));
        }
        let target = scaled_dimensions(source, max_width);

        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| ImageError::Encode("document unavailable".to_string()))?;
        let canvas = document
            .create_element("canvas")
            .map_err(|err| ImageError::Encode(format!("failed to create canvas: {err:?}")))?
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .map_err(|_| ImageError::Encode("failed to cast canvas".to_string()))?;
        canvas.set_width(target.width);
        canvas.set_height(target.height);

        let context = canvas
            .get_context("2d")
            .map_err(|err| ImageError::Encode(format!("{err:?}")))?
            .ok_or_else(|| ImageError::Encode("Could not get canvas context".to_string()))?
            .dyn_into::<web_sys::CanvasRenderingContext2d>()
            .map_err(|_| ImageError::Encode("failed to cast canvas context".to_string()))?;
        context
            .draw_image_with_html_image_element_and_dw_and_dh(
                &image,
                0.0,
                0.0,
                f64::from(target.width),
                f64::from(target.height),
            )
            .map_err(|err| ImageError::Encode(format!("drawImage failed: {err:?}")))?;

        canvas
            .to_data_url_with_type_and_encoder_options(
                COMPRESSED_MIME_TYPE,
                &JsValue::from_f64(clamp_quality(quality)),
            )
            .map_err(|err| ImageError::Encode(format!("toDataURL failed: {err:?}")))
    }

    async fn load_image(data_url: &str) -> Result<web_sys::HtmlImageElement, ImageError> {
        let image = web_sys::HtmlImageElement::new()
            .map_err(|err| ImageError::Decode(format!("{err:?}")))?;
        let (tx, rx) = oneshot::channel::<Result<(), ImageError>>();
        let sender = Rc::new(RefCell::new(Some(tx)));

        let load_sender = sender.clone();
        let on_load = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_| {
            if let Some(tx) = load_sender.borrow_mut().take() {
                let _ = tx.send(Ok(()));
            }
        }));
        image.set_onload(Some(on_load.as_ref().unchecked_ref()));

        let error_sender = sender.clone();
        let on_error = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_| {
            if let Some(tx) = error_sender.borrow_mut().take() {
                let _ = tx.send(Err(ImageError::Decode("Failed to load image".to_string())));
            }
        }));
        image.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        image.set_src(data_url);

        let result = rx
            .await
            .map_err(|_| ImageError::Decode("image load was interrupted".to_string()))?;
        image.set_onload(None);
        image.set_onerror(None);
        drop(on_load);
        drop(on_error);
        result.map(|()| image)
    }
}
