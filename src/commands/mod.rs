// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod employees;
pub mod ledger;
pub mod members;
pub mod reports;
pub mod vars;
