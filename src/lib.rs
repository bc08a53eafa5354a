//! Punch Reconciliation & Hour-Bucketing Engine
//!
//! This crate reconciles raw clock-in/clock-out punch streams into per-employee
//! ledgers of worked and justified hours, splitting worked time across
//! time-of-day buckets, tracking annual entitlement consumption, and flagging
//! scheduling anomalies (late arrivals, gaps, deviations, missing clock-outs,
//! absent days).

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod reconcile;
