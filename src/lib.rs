//! 대학 인증 증빙자료 준비 현황 대시보드
//!
//! 통합문서 입출력, 캐시, 보고서 파일 생성, CLI 정의.
//! 규칙 엔진은 `evidence_common`에 있다.

pub mod assign;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod store;
