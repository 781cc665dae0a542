use tracing::info;

use crate::core::error::Result;
use crate::features::identification::clients::PlantNetClient;
use crate::features::identification::dtos::{IdentifyResponseDto, PlantPhoto};

/// Forwards plant photos to PlantNet using the server-held key
pub struct IdentificationService {
    client: PlantNetClient,
}

impl IdentificationService {
    pub fn new(client: PlantNetClient) -> Self {
        if !client.is_configured() {
            tracing::warn!("PLANT_ID_API_KEY not set, /identify-plant will fail");
        }
        Self { client }
    }

    pub async fn identify(&self, photo: PlantPhoto) -> Result<IdentifyResponseDto> {
        info!(
            "Identifying plant photo {} ({} bytes)",
            photo.filename,
            photo.data.len()
        );

        let results = self.client.identify(photo).await?;
        info!("PlantNet returned {} results", results.len());

        Ok(IdentifyResponseDto::from_results(results))
    }
}
