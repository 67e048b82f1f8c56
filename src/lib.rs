// SPDX-License-Identifier: GPL-3.0-or-later

pub mod budget;
pub mod catalog;
pub mod config;
pub mod report;
pub mod storage;
pub mod watch;
