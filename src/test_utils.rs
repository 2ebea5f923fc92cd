use embedded_hal::i2c::{Error, ErrorKind, ErrorType};

#[derive(Debug)]
pub enum FakeI2cError {
    Error,
}
impl Error for FakeI2cError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// In-memory I2C bus capturing the raw write stream and serving queued read
/// bytes. Serves both the blocking and the async driver flavor.
pub struct FakeI2cBus<const N: usize, const M: usize> {
    pub write_data: heapless::Vec<u8, N>,
    pub read_data: heapless::Vec<u8, M>,
    error_after: Option<u32>,
}

impl<const N: usize, const M: usize> ErrorType for FakeI2cBus<N, M> {
    type Error = FakeI2cError;
}

impl<const N: usize, const M: usize> FakeI2cBus<N, M> {
    pub fn new() -> Self {
        Self {
            write_data: heapless::Vec::new(),
            read_data: heapless::Vec::new(),
            error_after: None,
        }
    }

    pub fn new_with_read_data(read_data: &[u8]) -> Self {
        Self {
            write_data: heapless::Vec::new(),
            read_data: heapless::Vec::from_slice(read_data).unwrap(),
            error_after: None,
        }
    }

    /// Succeed for `transactions` transactions, then fail every subsequent
    /// one with [`FakeI2cError::Error`].
    pub fn with_error_after(mut self, transactions: u32) -> Self {
        self.error_after = Some(transactions);
        self
    }

    pub fn write_data_as_ref(&self) -> &[u8] {
        self.write_data.as_slice()
    }

    #[allow(dead_code)]
    pub fn read_data_as_ref(&self) -> &[u8] {
        self.read_data.as_slice()
    }

    fn run(
        &mut self,
        operations: &mut [embedded_hal::i2c::Operation],
    ) -> Result<(), FakeI2cError> {
        if let Some(remaining) = &mut self.error_after {
            if *remaining == 0 {
                return Err(FakeI2cError::Error);
            }
            *remaining -= 1;
        }
        for operation in operations {
            match operation {
                embedded_hal::i2c::Operation::Write(write) => {
                    self.write_data
                        .extend_from_slice(write)
                        .map_err(|_| FakeI2cError::Error)?;
                }
                embedded_hal::i2c::Operation::Read(read) => {
                    if read.len() > self.read_data.len() {
                        return Err(FakeI2cError::Error);
                    }
                    for byte in read.iter_mut() {
                        *byte = self.read_data.remove(0);
                    }
                }
            }
        }
        Ok(())
    }
}

impl<const N: usize, const M: usize> embedded_hal::i2c::I2c for FakeI2cBus<N, M> {
    fn transaction(
        &mut self,
        _address: embedded_hal::i2c::SevenBitAddress,
        operations: &mut [embedded_hal::i2c::Operation],
    ) -> Result<(), Self::Error> {
        self.run(operations)
    }
}

impl<const N: usize, const M: usize> embedded_hal_async::i2c::I2c for FakeI2cBus<N, M> {
    async fn transaction(
        &mut self,
        _address: embedded_hal::i2c::SevenBitAddress,
        operations: &mut [embedded_hal::i2c::Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.run(operations)
    }
}

/// Delay provider that returns immediately, for monitor tests.
pub struct NoopDelay;

impl embedded_hal::delay::DelayNs for NoopDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

impl embedded_hal_async::delay::DelayNs for NoopDelay {
    async fn delay_ns(&mut self, _ns: u32) {}
}
