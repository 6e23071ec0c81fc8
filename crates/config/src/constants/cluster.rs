// Copyright 2024 RustFS Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// Port of the cluster management REST API
/// Default value: 4443
/// Environment variable: EMCECS_MGMT_PORT
pub const DEFAULT_MGMT_PORT: u16 = 4443;

/// Per-request timeout applied by the cluster client, in seconds
/// Default value: 30
/// Environment variable: EMCECS_REQUEST_TIMEOUT
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Header carrying the management session token
pub const AUTH_TOKEN_HEADER: &str = "X-SDS-AUTH-TOKEN";

pub const LOGIN_PATH: &str = "/login";
pub const LOGOUT_PATH: &str = "/logout";
pub const NAMESPACES_PATH: &str = "/object/namespaces";
pub const BUCKET_BILLING_PATH_PREFIX: &str = "/object/billing/buckets";
pub const NODE_LIST_PATH: &str = "/dashboard/zones/localzone/nodes";
pub const NODE_DETAIL_PATH_PREFIX: &str = "/dashboard/nodes";
