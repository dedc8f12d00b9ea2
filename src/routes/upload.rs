use crate::config::Config;
use crate::errors::UploadError;
use crate::models::UploadResponse;
use crate::utils::file_type::is_acceptable_file;
use crate::utils::storage::{save_file, StoredBatch};
use actix_multipart::{Field, Multipart};
use actix_web::http::header;
use actix_web::{web, HttpResponse};
use futures::TryStreamExt;
use log::{info, warn};

const IMAGE_FIELD: &str = "image";
const IMAGES_FIELD: &str = "images";
// Declared type of file parts sent without a Content-Type
const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/uploadsingleimage").route(web::post().to(upload_single_image)))
        .service(
            web::resource("/uploadmultipleimages").route(web::post().to(upload_multiple_images)),
        );
}

pub async fn upload_single_image(
    mut payload: Multipart,
    config: web::Data<Config>,
) -> Result<HttpResponse, UploadError> {
    let batch = receive_images(&mut payload, IMAGE_FIELD, 1, &config)
        .await
        .map_err(|e| match e {
            UploadError::InvalidType(_) => UploadError::NoImage,
            e => e,
        })?;
    if batch.is_empty() {
        return Err(UploadError::NoImage);
    }

    batch.commit();
    Ok(HttpResponse::Created().json(UploadResponse::new("Thank you for uploading image")))
}

pub async fn upload_multiple_images(
    mut payload: Multipart,
    config: web::Data<Config>,
) -> Result<HttpResponse, UploadError> {
    let batch = receive_images(&mut payload, IMAGES_FIELD, config.max_files, &config).await?;
    if batch.is_empty() {
        return Err(UploadError::NoImages);
    }

    let count = batch.commit();
    info!("Received {} images", count);
    Ok(HttpResponse::Created().json(UploadResponse::new(format!(
        "Thank you for uploading {} image(s)",
        count
    ))))
}

/// Store every file part sent under `field_name`, up to `max_files` of them.
///
/// The first file failing the type check, the size limit or the field rules
/// aborts the whole request, and the files already stored are removed.
async fn receive_images(
    payload: &mut Multipart,
    field_name: &str,
    max_files: usize,
    config: &Config,
) -> Result<StoredBatch, UploadError> {
    let mut batch = StoredBatch::new();

    while let Some(mut field) = payload.try_next().await? {
        // Text fields and empty file inputs carry no file
        let Some(original_name) = upload_file_name(&field) else {
            continue;
        };
        if field.name() != Some(field_name) || batch.len() >= max_files {
            warn!(
                "Unexpected file field {:?} ({})",
                field.name().unwrap_or_default(),
                original_name
            );
            return Err(UploadError::UnexpectedField);
        }

        let mime_type = declared_mime_type(&field);
        if let Err(reason) = is_acceptable_file(&original_name, &mime_type) {
            warn!("Rejected {} ({}): {}", original_name, mime_type, reason);
            return Err(UploadError::InvalidType(reason));
        }

        let path = save_file(
            &mut field,
            &original_name,
            &config.images_dir,
            config.max_file_size,
        )
        .await
        .inspect_err(|e| warn!("Could not store {}: {}", original_name, e))?;
        info!("Received {} ({}), stored as {}", original_name, mime_type, path.display());
        batch.push(path);
    }

    Ok(batch)
}

/// The part's Content-Type as sent, parameters stripped.
fn declared_mime_type(field: &Field) -> String {
    field
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|essence| essence.trim().to_owned())
        .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_owned())
}

fn upload_file_name(field: &Field) -> Option<String> {
    field
        .content_disposition()?
        .get_filename()
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
}
