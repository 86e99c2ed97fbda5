// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod admin;
pub mod api;
pub mod buckets;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod documents;
pub mod employees;
pub mod error;
pub mod filter;
pub mod ledger;
pub mod logging;
pub mod members;
pub mod models;
pub mod reports;
pub mod sms;
pub mod utils;
