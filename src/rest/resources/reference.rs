//! Read-only reference data: stacks, regions, time zones and the system
//! variables jobs run with.

use serde_json::Map;

use crate::entity;
use crate::rest::{Collection, Entity, Params, ResourceError, XplentyClient};

entity! {
    #[entity(key = "stack", path = "stacks", primary_key = "id")]
    /// A software stack clusters can run.
    pub struct Stack {
        id: Str,
        name: Str,
    }
}

entity! {
    #[entity(key = "region", path = "regions", base = Short, primary_key = "id")]
    /// A region accounts and clusters can be placed in.
    pub struct Region {
        id: Str,
        name: Str,
        group_name: Str,
    }
}

entity! {
    #[entity(key = "timezone", path = "timezones", base = Short, primary_key = "id")]
    pub struct Timezone {
        id: Str,
        name: Str,
    }
}

entity! {
    #[entity(key = "variables", path = "variables", base = Short)]
    /// Predefined system variables and their default values.
    pub struct SysVariable {
        copy_parallelism as "_COPY_PARALLELISM": Str,
        parquet_compression as "_PARQUET_COMPRESSION": Str,
        parquet_page_size as "_PARQUET_PAGE_SIZE": Str,
        parquet_block_size as "_PARQUET_BLOCK_SIZE": Str,
        max_combined_split_size as "_MAX_COMBINED_SPLIT_SIZE": Int,
        bytes_per_reduce as "_BYTES_PER_REDUCE": Int,
        line_record_reader_max_length as "_LINE_RECORD_READER_MAX_LENGTH": Int,
        default_parallelism as "_DEFAULT_PARALLELISM": Int,
        copy_target_partitions as "_COPY_TARGET_PARTITIONS": Int,
        copy_target_size as "_COPY_TARGET_SIZE": Int,
        default_timezone as "_DEFAULT_TIMEZONE": Str,
        shuffle_input_buffer_percent as "_SHUFFLE_INPUT_BUFFER_PERCENT": Float,
    }
}

impl XplentyClient {
    /// Lists the stacks available to the account.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn stacks(&self) -> Result<Collection<Stack>, ResourceError> {
        self.fetch_collection(Stack::PATH, None, Map::new())
    }

    /// Lists regions, optionally restricted to a brand.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn regions(&self, brand_id: Option<&str>) -> Result<Collection<Region>, ResourceError> {
        let query = brand_id.map(|brand_id| Params::new().set("brand_id", brand_id));
        self.fetch_collection(Region::PATH, query.as_ref(), Map::new())
    }

    /// Lists the supported time zones.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn timezones(&self) -> Result<Collection<Timezone>, ResourceError> {
        self.fetch_collection(Timezone::PATH, None, Map::new())
    }

    /// Fetches the system variables and their defaults.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn system_variables(&self) -> Result<SysVariable, ResourceError> {
        self.fetch_one(SysVariable::PATH, None)
    }
}
