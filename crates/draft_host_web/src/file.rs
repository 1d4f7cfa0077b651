//! Reading user-selected image files.

use draft_host::ImageCandidate;

/// Returns the metadata checked before a selected file is read.
pub fn image_candidate(file: &web_sys::File) -> ImageCandidate {
    ImageCandidate::new(file.type_(), file.size().max(0.0) as u64)
}

/// Reads `file` into a `data:` URL through `FileReader`.
///
/// # Errors
///
/// Returns an error when the read cannot start, fails, or is interrupted, and on non-wasm
/// targets.
pub async fn read_file_as_data_url(file: &web_sys::File) -> Result<String, String> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = file;
        Err("file reading is only available when compiled for wasm32".to_string())
    }

    #[cfg(target_arch = "wasm32")]
    {
        use std::{cell::RefCell, rc::Rc};

        use futures::channel::oneshot;
        use wasm_bindgen::{closure::Closure, JsCast};

        let reader = web_sys::FileReader::new().map_err(|err| format!("{err:?}"))?;
        let (tx, rx) = oneshot::channel::<Result<String, String>>();
        let sender = Rc::new(RefCell::new(Some(tx)));

        let reader_for_load = reader.clone();
        let load_sender = sender.clone();
        let on_load = Closure::<dyn FnMut(web_sys::ProgressEvent)>::wrap(Box::new(move |_| {
            let result = reader_for_load
                .result()
                .map_err(|err| format!("failed to read image file: {err:?}"))
                .and_then(|value| {
                    value
                        .as_string()
                        .ok_or_else(|| "file reader returned non-string result".to_string())
                });
            if let Some(tx) = load_sender.borrow_mut().take() {
                let _ = tx.send(result);
            }
        }));
        reader.set_onload(Some(on_load.as_ref().unchecked_ref()));

        let error_sender = sender.clone();
        let on_error = Closure::<dyn FnMut(web_sys::ProgressEvent)>::wrap(Box::new(move |_| {
            if let Some(tx) = error_sender.borrow_mut().take() {
                let _ = tx.send(Err(
                    "Failed to read the image file. Please try again.".to_string()
                ));
            }
        }));
        reader.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        reader
            .read_as_data_url(file)
            .map_err(|err| format!("failed to start file read: {err:?}"))?;

        let result = rx
            .await
            .map_err(|_| "image file read was interrupted".to_string())?;
        on_load.forget();
        on_error.forget();
        result
    }
}
