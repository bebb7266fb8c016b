//! Audio handles binding a decoded header to its sample source.
//!
//! An [`AudioHandle`] is created by decoding the header of a borrowed source.
//! Validation consumes it and yields a [`ValidatedAudio`], which is the only
//! type the combination operations accept.

use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::process::validate::Validator;
use crate::process::{CombineStats, concat, merge};
use crate::structs::header::{HEADER_LEN, Header};
use crate::utils::errors::{CombineError, DecodeError, ValidationError};

/// Position-addressable byte source: anything that can seek to an offset and
/// read the bytes that follow.
pub trait SampleSource: Read + Seek {}

impl<T: Read + Seek + ?Sized> SampleSource for T {}

#[derive(Debug)]
pub struct AudioHandle<'a, S: SampleSource + ?Sized> {
    header: Header,
    source: &'a mut S,
}

impl<'a, S: SampleSource + ?Sized> AudioHandle<'a, S> {
    /// Decodes the header found at the start of `source`.
    pub fn new(source: &'a mut S) -> Result<Self, DecodeError> {
        source.seek(SeekFrom::Start(0))?;
        let header = Header::decode(&mut *source)?;
        Ok(Self { header, source })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Runs the default (non-strict) validator.
    pub fn validate(self) -> Result<ValidatedAudio<'a, S>, ValidationError> {
        self.validate_with(&Validator::default())
    }

    pub fn validate_with(
        self,
        validator: &Validator,
    ) -> Result<ValidatedAudio<'a, S>, ValidationError> {
        validator.validate(&self.header)?;
        Ok(ValidatedAudio {
            header: self.header,
            source: self.source,
        })
    }

    pub fn into_source(self) -> &'a mut S {
        self.source
    }
}

/// An audio handle whose header passed validation.
#[derive(Debug)]
pub struct ValidatedAudio<'a, S: SampleSource + ?Sized> {
    header: Header,
    source: &'a mut S,
}

impl<'a, S: SampleSource + ?Sized> ValidatedAudio<'a, S> {
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Interleaves `self` (left channel) with `right` into a stereo stream.
    pub fn merge<R, W>(
        &mut self,
        right: &mut ValidatedAudio<'_, R>,
        output: &mut W,
    ) -> Result<CombineStats, CombineError>
    where
        R: SampleSource + ?Sized,
        W: Write + ?Sized,
    {
        merge::merge(self, right, output)
    }

    /// Writes `self` followed by `next` as one stream.
    pub fn concat<R, W>(
        &mut self,
        next: &mut ValidatedAudio<'_, R>,
        output: &mut W,
    ) -> Result<CombineStats, CombineError>
    where
        R: SampleSource + ?Sized,
        W: Write + ?Sized,
    {
        concat::concat(self, next, output)
    }

    pub fn into_source(self) -> &'a mut S {
        self.source
    }

    /// Moves the source cursor to the first payload byte.
    pub(crate) fn rewind_payload(&mut self) -> io::Result<()> {
        self.source.seek(SeekFrom::Start(HEADER_LEN as u64))?;
        Ok(())
    }

    /// Reader over the declared payload, starting at the current position.
    pub(crate) fn payload(&mut self) -> io::Take<&mut S> {
        Read::take(&mut *self.source, self.header.data_size as u64)
    }
}
